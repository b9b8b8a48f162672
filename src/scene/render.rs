use egui::epaint::{Mesh, Vertex};
use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, TextureId};

use crate::scene::camera::{Camera, NEAR_PLANE};
use crate::scene::math::{dot3, lerp3, sub3};
use crate::scene::room::{Quad, TvLayout, ROOM_DEPTH, ROOM_HEIGHT, ROOM_WIDTH};

const SKY: Color32 = Color32::from_rgb(0x87, 0xce, 0xeb);
const FLOOR: Color32 = Color32::from_rgb(0x8b, 0x73, 0x55);
const CEILING: Color32 = Color32::from_rgb(0xf2, 0xf2, 0xf2);
const FRONT_WALL: Color32 = Color32::from_rgb(0xe6, 0xe6, 0xe6);
const SIDE_WALL: Color32 = Color32::from_rgb(0xd4, 0xd4, 0xd4);
const TV_BODY: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
const TV_SCREEN: Color32 = Color32::BLACK;

/// Textured quads are split into a grid so affine mapping stays close to perspective.
const TEXTURE_GRID: usize = 8;

#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    view: [f32; 3],
    uv: Pos2,
}

/// One frame's worth of textures to put on the TV.
pub struct TvTextures<'a> {
    pub video: Option<TextureId>,
    /// Overlay quads in draw order.
    pub overlays: &'a [(Quad, TextureId)],
}

/// Paints the room and the TV as seen by `camera` into `rect`.
pub fn paint_scene(
    painter: &Painter,
    rect: Rect,
    camera: &Camera,
    layout: &TvLayout,
    screen_scale: (f32, f32),
    textures: &TvTextures<'_>,
) {
    painter.rect_filled(rect, 0.0, SKY);
    let projector = Projector::new(camera, rect);

    let mut surfaces = room_surfaces();
    surfaces.sort_by(|a, b| {
        let da = projector.depth(a.0);
        let db = projector.depth(b.0);
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });
    for (corners, color) in &surfaces {
        projector.fill(painter, corners, *color);
    }

    projector.fill(painter, &layout.body().corners(), TV_BODY);
    projector.fill(painter, &layout.screen_area().corners(), TV_SCREEN);
    if let Some(video) = textures.video {
        projector.textured(painter, &layout.video(screen_scale), video);
    }
    for (quad, texture) in textures.overlays {
        projector.textured(painter, quad, *texture);
    }
}

/// Floor, ceiling and the three walls. The wall behind the start position is open.
fn room_surfaces() -> Vec<([[f32; 3]; 4], Color32)> {
    let (w, h, d) = (ROOM_WIDTH / 2.0, ROOM_HEIGHT / 2.0, ROOM_DEPTH / 2.0);
    vec![
        ([[-w, -h, -d], [w, -h, -d], [w, -h, d], [-w, -h, d]], FLOOR),
        ([[-w, h, -d], [w, h, -d], [w, h, d], [-w, h, d]], CEILING),
        ([[-w, h, -d], [w, h, -d], [w, -h, -d], [-w, -h, -d]], FRONT_WALL),
        ([[-w, h, -d], [-w, h, d], [-w, -h, d], [-w, -h, -d]], SIDE_WALL),
        ([[w, h, -d], [w, h, d], [w, -h, d], [w, -h, -d]], SIDE_WALL),
    ]
}

struct Projector<'a> {
    camera: &'a Camera,
    center: Pos2,
    focal: f32,
}

impl<'a> Projector<'a> {
    fn new(camera: &'a Camera, rect: Rect) -> Self {
        Self {
            camera,
            center: rect.center(),
            focal: Camera::focal_length(rect.height()),
        }
    }

    fn depth(&self, corners: [[f32; 3]; 4]) -> f32 {
        let sum = corners
            .iter()
            .fold([0.0, 0.0, 0.0], |acc, c| [acc[0] + c[0], acc[1] + c[1], acc[2] + c[2]]);
        let center = [sum[0] / 4.0, sum[1] / 4.0, sum[2] / 4.0];
        let rel = sub3(center, self.camera.position);
        dot3(rel, rel)
    }

    fn project(&self, view: [f32; 3]) -> Pos2 {
        Pos2::new(
            self.center.x + view[0] / view[2] * self.focal,
            self.center.y - view[1] / view[2] * self.focal,
        )
    }

    fn clip_and_project(&self, polygon: &[ClipVertex]) -> Vec<(Pos2, Pos2)> {
        clip_near(polygon)
            .into_iter()
            .map(|v| (self.project(v.view), v.uv))
            .collect()
    }

    fn fill(&self, painter: &Painter, corners: &[[f32; 3]; 4], color: Color32) {
        let polygon: Vec<ClipVertex> = corners
            .iter()
            .map(|c| ClipVertex { view: self.camera.to_view(*c), uv: Pos2::ZERO })
            .collect();
        let points: Vec<Pos2> = self.clip_and_project(&polygon).into_iter().map(|(p, _)| p).collect();
        if points.len() >= 3 {
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }
    }

    fn textured(&self, painter: &Painter, quad: &Quad, texture: TextureId) {
        let [tl, tr, br, bl] = quad.corners();
        let mut mesh = Mesh::with_texture(texture);

        for row in 0..TEXTURE_GRID {
            for col in 0..TEXTURE_GRID {
                let (u0, u1) = (col as f32 / TEXTURE_GRID as f32, (col + 1) as f32 / TEXTURE_GRID as f32);
                let (v0, v1) = (row as f32 / TEXTURE_GRID as f32, (row + 1) as f32 / TEXTURE_GRID as f32);
                let at = |u: f32, v: f32| {
                    let top = lerp3(tl, tr, u);
                    let bottom = lerp3(bl, br, u);
                    ClipVertex {
                        view: self.camera.to_view(lerp3(top, bottom, v)),
                        uv: Pos2::new(u, v),
                    }
                };
                let cell = [at(u0, v0), at(u1, v0), at(u1, v1), at(u0, v1)];
                let projected = self.clip_and_project(&cell);
                if projected.len() < 3 {
                    continue;
                }

                let base = mesh.vertices.len() as u32;
                for (pos, uv) in &projected {
                    mesh.vertices.push(Vertex { pos: *pos, uv: *uv, color: Color32::WHITE });
                }
                for i in 1..projected.len() as u32 - 1 {
                    mesh.add_triangle(base, base + i, base + i + 1);
                }
            }
        }

        if !mesh.is_empty() {
            painter.add(Shape::mesh(mesh));
        }
    }
}

/// Sutherland-Hodgman clip of a convex polygon against the near plane.
fn clip_near(polygon: &[ClipVertex]) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(polygon.len() + 2);
    for (i, current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let current_in = current.view[2] >= NEAR_PLANE;
        let next_in = next.view[2] >= NEAR_PLANE;

        if current_in {
            out.push(*current);
        }
        if current_in != next_in {
            let t = (NEAR_PLANE - current.view[2]) / (next.view[2] - current.view[2]);
            out.push(ClipVertex {
                view: lerp3(current.view, next.view, t),
                uv: current.uv + (next.uv - current.uv) * t,
            });
        }
    }
    out
}
