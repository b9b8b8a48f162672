use crate::scene::math::{add3, cross3, dot3, normalize3, scale3, sub3};
use crate::scene::room::{Quad, ROOM_DEPTH, ROOM_WIDTH};

const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
const WALL_MARGIN: f32 = 0.3;
const MAX_PITCH: f32 = 1.45;
const LOOK_SENSITIVITY: f32 = 0.004;

/// Keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.back || self.left || self.right)
    }
}

/// First-person camera. Yaw 0 looks down -z at the TV wall.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Camera {
    pub fn forward(&self) -> [f32; 3] {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        [-sy * cp, sp, -cy * cp]
    }

    pub fn right(&self) -> [f32; 3] {
        let (sy, cy) = self.yaw.sin_cos();
        [cy, 0.0, -sy]
    }

    pub fn up(&self) -> [f32; 3] {
        cross3(self.right(), self.forward())
    }

    /// Mouse drag in pixels.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - dy * LOOK_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Moves on the floor plane relative to the view, clamped inside the room.
    pub fn walk(&mut self, input: MoveInput, speed: f32) {
        if input.is_idle() {
            return;
        }
        let forward = normalize3([self.forward()[0], 0.0, self.forward()[2]]);
        let right = self.right();

        let mut step = [0.0, 0.0, 0.0];
        if input.forward {
            step = add3(step, forward);
        }
        if input.back {
            step = sub3(step, forward);
        }
        if input.right {
            step = add3(step, right);
        }
        if input.left {
            step = sub3(step, right);
        }
        let step = scale3(normalize3(step), speed);
        let next = add3(self.position, step);

        let half_w = ROOM_WIDTH / 2.0 - WALL_MARGIN;
        let half_d = ROOM_DEPTH / 2.0 - WALL_MARGIN;
        self.position = [next[0].clamp(-half_w, half_w), next[1], next[2].clamp(-half_d, half_d)];
    }

    /// World point in view space: x right, y up, z depth along the view.
    pub fn to_view(&self, point: [f32; 3]) -> [f32; 3] {
        let rel = sub3(point, self.position);
        [dot3(rel, self.right()), dot3(rel, self.up()), dot3(rel, self.forward())]
    }

    /// Focal length in pixels for a viewport of `height` pixels.
    pub fn focal_length(height: f32) -> f32 {
        (height / 2.0) / (FOV_Y_DEGREES.to_radians() / 2.0).tan()
    }

    /// True if the ray through the view center hits `target` in its plane.
    pub fn looking_at(&self, target: &Quad) -> bool {
        let forward = self.forward();
        let plane_z = target.center[2];
        if forward[2] >= -1e-6 {
            return false;
        }
        let t = (plane_z - self.position[2]) / forward[2];
        if t <= 0.0 {
            return false;
        }
        let hit = add3(self.position, scale3(forward, t));
        target.contains_xy(hit[0], hit[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScreenBounds;
    use crate::scene::room::TvLayout;

    fn screen() -> Quad {
        TvLayout::new(ScreenBounds::default()).screen_area()
    }

    #[test]
    fn test_default_camera_looks_at_tv() {
        let camera = Camera::default();
        assert!(camera.looking_at(&screen()));
    }

    #[test]
    fn test_turning_away_loses_tv() {
        let mut camera = Camera::default();
        camera.yaw = std::f32::consts::PI;
        assert!(!camera.looking_at(&screen()));

        let mut camera = Camera::default();
        camera.yaw = 0.6;
        assert!(!camera.looking_at(&screen()));
    }

    #[test]
    fn test_walk_forward_moves_toward_tv() {
        let mut camera = Camera::default();
        camera.walk(MoveInput { forward: true, ..Default::default() }, 0.1);
        assert!((camera.position[2] + 0.1).abs() < 1e-6);
        assert_eq!(camera.position[1], 0.0);
    }

    #[test]
    fn test_diagonal_walk_is_normalized() {
        let mut camera = Camera::default();
        camera.walk(MoveInput { forward: true, right: true, ..Default::default() }, 0.1);
        let moved = (camera.position[0].powi(2) + camera.position[2].powi(2)).sqrt();
        assert!((moved - 0.1).abs() < 1e-6);
        assert!(camera.position[0] > 0.0);
    }

    #[test]
    fn test_walk_is_clamped_to_room() {
        let mut camera = Camera::default();
        for _ in 0..200 {
            camera.walk(MoveInput { forward: true, ..Default::default() }, 0.1);
        }
        assert!(camera.position[2] >= -(ROOM_DEPTH / 2.0));
        assert!((camera.position[2] + ROOM_DEPTH / 2.0 - WALL_MARGIN).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_is_limited() {
        let mut camera = Camera::default();
        camera.look(0.0, -100_000.0);
        assert!(camera.pitch <= MAX_PITCH);
    }

    #[test]
    fn test_point_ahead_has_positive_depth() {
        let camera = Camera::default();
        let view = camera.to_view([0.0, 0.0, -3.0]);
        assert!((view[2] - 3.0).abs() < 1e-6);
        assert!(view[0].abs() < 1e-6 && view[1].abs() < 1e-6);
        assert!(camera.to_view([1.0, 0.0, -3.0])[0] > 0.0);
    }
}
