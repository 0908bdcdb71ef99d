//! Shape generation for 2D primitives
//!
//! Everything is built from axis-aligned quads in world coordinates.

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering `rect`
pub fn quad(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (l, r, t, b) = (rect.left(), rect.right(), rect.top(), rect.bottom());
    [
        Vertex::new(l, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
    ]
}

/// Append a filled rectangle
pub fn push_rect(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    out.extend_from_slice(&quad(rect, color));
}

/// Append a rectangle border of the given thickness, drawn inside `rect`
pub fn push_outline(out: &mut Vec<Vertex>, rect: &Rect, thickness: f32, color: [f32; 4]) {
    let t = thickness.min(rect.w / 2.0).min(rect.h / 2.0);
    let edges = [
        Rect::new(rect.x, rect.y, rect.w, t),
        Rect::new(rect.x, rect.bottom() - t, rect.w, t),
        Rect::new(rect.x, rect.y + t, t, rect.h - 2.0 * t),
        Rect::new(rect.right() - t, rect.y + t, t, rect.h - 2.0 * t),
    ];
    for edge in &edges {
        push_rect(out, edge, color);
    }
}

/// Multiply alpha, for blinking or faded overlays
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_spans_rect() {
        let verts = quad(&Rect::new(10.0, 20.0, 30.0, 40.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_outline_is_four_quads() {
        let mut out = Vec::new();
        push_outline(&mut out, &Rect::new(0.0, 0.0, 100.0, 50.0), 2.0, [1.0; 4]);
        assert_eq!(out.len(), 24);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha([1.0, 0.5, 0.0, 0.8], 0.5), [1.0, 0.5, 0.0, 0.4]);
    }
}
