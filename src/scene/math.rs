//! Small vector helpers for the room scene. Vectors are plain `[f32; 3]`.

pub fn add3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale3(a: [f32; 3], s: f32) -> [f32; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot3(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm3(a: [f32; 3]) -> f32 {
    dot3(a, a).sqrt()
}

pub fn normalize3(a: [f32; 3]) -> [f32; 3] {
    let n = norm3(a);
    if n == 0.0 {
        [0.0, 0.0, 0.0]
    } else {
        [a[0] / n, a[1] / n, a[2] / n]
    }
}

pub fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    add3(a, scale3(sub3(b, a), t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_of_axes() {
        assert_eq!(cross3([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(normalize3([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
        assert!((norm3(normalize3([3.0, 4.0, 0.0])) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_midpoint() {
        assert_eq!(lerp3([0.0, 0.0, 0.0], [2.0, 4.0, -2.0], 0.5), [1.0, 2.0, -1.0]);
    }
}
