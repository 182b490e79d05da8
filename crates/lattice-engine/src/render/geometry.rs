//! Vertex data for the built-in primitives.
//!
//! Everything here is pure and GPU-free. Coordinates are normalized device
//! coordinates with `z = 0`.

use super::vertex::{ColorVertex, Vertex};

/// Half the side length of the built-in square.
pub const SQUARE_HALF_EXTENT: f32 = 0.05;

/// Two counter-clockwise triangles over the square's four corners.
pub const SQUARE_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Number of vertices [`grid_vertices`] returns for `num_lines`.
#[inline]
pub fn grid_vertex_count(num_lines: u32) -> usize {
    (2 * num_lines as usize + 1) * 4
}

/// Size in bytes of the vertex buffer for a grid of `num_lines`.
pub fn grid_byte_size(num_lines: u32) -> u64 {
    (2 * u64::from(num_lines) + 1) * 4 * std::mem::size_of::<Vertex>() as u64
}

/// Line-list vertices for a grid centered at the origin.
///
/// For every `i` in `-num_lines..=num_lines` this emits a horizontal segment
/// `(-1, i*spacing) -> (1, i*spacing)` followed by a vertical segment
/// `(i*spacing, -1) -> (i*spacing, 1)`, in increasing `i`.
///
/// Lines that land outside `[-1, 1]` are still emitted; the rasterizer clips them.
pub fn grid_vertices(num_lines: u32, spacing: f32) -> Vec<Vertex> {
    let n = i64::from(num_lines);
    let mut out = Vec::with_capacity(grid_vertex_count(num_lines));

    for i in -n..=n {
        let pos = i as f32 * spacing;

        // horizontal
        out.push(Vertex::new(-1.0, pos, 0.0));
        out.push(Vertex::new(1.0, pos, 0.0));

        // vertical
        out.push(Vertex::new(pos, -1.0, 0.0));
        out.push(Vertex::new(pos, 1.0, 0.0));
    }

    out
}

/// Corners of the built-in square: bottom-left, bottom-right, top-right, top-left.
pub fn square_vertices() -> [Vertex; 4] {
    let h = SQUARE_HALF_EXTENT;
    [
        Vertex::new(-h, -h, 0.0),
        Vertex::new(h, -h, 0.0),
        Vertex::new(h, h, 0.0),
        Vertex::new(-h, h, 0.0),
    ]
}

/// [`square_vertices`] with the same RGB color on every corner.
pub fn colored_square_vertices(rgb: [f32; 3]) -> [ColorVertex; 4] {
    square_vertices().map(|v| ColorVertex::new(v.position, rgb))
}

#[inline]
pub fn point_vertex(x: f32, y: f32) -> Vertex {
    Vertex::new(x, y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_count_matches_formula() {
        for (n, spacing) in [(0, 1.0), (1, 0.5), (10, 0.1), (37, 0.02)] {
            let v = grid_vertices(n, spacing);
            assert_eq!(v.len(), (2 * n as usize + 1) * 4, "n = {n}");
            assert_eq!(v.len(), grid_vertex_count(n));
        }
    }

    #[test]
    fn grid_byte_size_counts_every_vertex() {
        assert_eq!(grid_byte_size(0), 4 * 12);
        assert_eq!(grid_byte_size(10), 84 * 12);
        assert_eq!(grid_byte_size(10) as usize, grid_vertex_count(10) * std::mem::size_of::<Vertex>());
    }

    #[test]
    fn huge_grids_exceed_a_default_buffer_limit() {
        assert_eq!(grid_byte_size(3_000_000), 288_000_048);
        assert!(grid_byte_size(3_000_000) > 256 << 20);
        assert!(grid_byte_size(u32::MAX) > grid_byte_size(3_000_000));
    }

    #[test]
    fn grid_is_flat() {
        assert!(grid_vertices(10, 0.1).iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn single_line_grid_is_the_axes() {
        let v: Vec<[f32; 3]> = grid_vertices(0, 1.0).iter().map(|v| v.position).collect();
        assert_eq!(
            v,
            vec![
                [-1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 1.0, 0.0],
            ]
        );
    }

    #[test]
    fn horizontal_then_vertical_for_each_offset() {
        let v = grid_vertices(1, 0.5);
        let pos: Vec<[f32; 3]> = v.iter().map(|v| v.position).collect();

        // i = -1
        assert_eq!(&pos[0..4], &[[-1.0, -0.5, 0.0], [1.0, -0.5, 0.0], [-0.5, -1.0, 0.0], [-0.5, 1.0, 0.0]]);
        // i = 1
        assert_eq!(&pos[8..12], &[[-1.0, 0.5, 0.0], [1.0, 0.5, 0.0], [0.5, -1.0, 0.0], [0.5, 1.0, 0.0]]);
    }

    #[test]
    fn offsets_step_by_spacing() {
        let v = grid_vertices(3, 0.25);
        let ys: Vec<f32> = v.chunks(4).map(|c| c[0].position[1]).collect();
        assert_eq!(ys, vec![-0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(grid_vertices(5, 0.2), grid_vertices(5, 0.2));
    }

    #[test]
    fn square_indices_form_two_triangles() {
        assert_eq!(SQUARE_INDICES.len(), 6);
        assert_eq!(SQUARE_INDICES.len() / 3, 2);
        assert!(SQUARE_INDICES.iter().all(|&i| (i as usize) < square_vertices().len()));
    }

    #[test]
    fn square_spans_half_extent() {
        let v = square_vertices();
        assert_eq!(v[0].position, [-0.05, -0.05, 0.0]);
        assert_eq!(v[2].position, [0.05, 0.05, 0.0]);
    }

    #[test]
    fn colored_square_shares_corners() {
        let c = colored_square_vertices([1.0, 0.0, 0.0]);
        for (cv, v) in c.iter().zip(square_vertices()) {
            assert_eq!(cv.position, v.position);
            assert_eq!(cv.color, [1.0, 0.0, 0.0]);
        }
    }
}
