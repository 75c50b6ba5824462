//! Folding-cube net data and geometry.
//!
//! The model is fixed: 6 square faces of 4 vertices each, 24 points total.
//! Face `i` owns vertices `[4 * i, 4 * i + 4)`. Faces are never materialized
//! as objects; every query recomputes from the live vertex positions, which
//! is cheap at this size and always reflects the current shape.

use nalgebra::Point3;

/// Number of faces in the model.
pub(crate) const FACE_COUNT: usize = 6;
/// Vertices per face.
pub(crate) const VERTS_PER_FACE: usize = 4;
/// Total vertex count.
pub(crate) const VERTEX_COUNT: usize = FACE_COUNT * VERTS_PER_FACE;

/// The cross-shaped starting net, flat in the z = 0 plane.
///
/// Face 0 sits on the far left; faces 2 and 3 form the middle of the cross
/// with face 1 below and face 4 above; face 5 closes the right arm. All
/// squares have side length 2 and integer corners.
#[rustfmt::skip]
pub(crate) const NET_VERTICES: [Point3<f32>; VERTEX_COUNT] = [
    Point3::new(-4.0, -1.0, 0.0), // face 0
    Point3::new(-2.0, -1.0, 0.0),
    Point3::new(-2.0,  1.0, 0.0),
    Point3::new(-4.0,  1.0, 0.0),
    Point3::new(-2.0, -3.0, 0.0), // face 1
    Point3::new( 0.0, -3.0, 0.0),
    Point3::new( 0.0, -1.0, 0.0),
    Point3::new(-2.0, -1.0, 0.0),
    Point3::new(-2.0, -1.0, 0.0), // face 2
    Point3::new( 0.0, -1.0, 0.0),
    Point3::new( 0.0,  1.0, 0.0),
    Point3::new(-2.0,  1.0, 0.0),
    Point3::new( 0.0, -1.0, 0.0), // face 3
    Point3::new( 2.0, -1.0, 0.0),
    Point3::new( 2.0,  1.0, 0.0),
    Point3::new( 0.0,  1.0, 0.0),
    Point3::new( 0.0,  1.0, 0.0), // face 4
    Point3::new( 2.0,  1.0, 0.0),
    Point3::new( 2.0,  3.0, 0.0),
    Point3::new( 0.0,  3.0, 0.0),
    Point3::new( 2.0, -1.0, 0.0), // face 5
    Point3::new( 4.0, -1.0, 0.0),
    Point3::new( 4.0,  1.0, 0.0),
    Point3::new( 2.0,  1.0, 0.0),
];

/// Per-face fill colors plus the two line colors, selected by instance
/// index: slots 0..6 are the faces, 6 is the net marker, 7 the selection
/// highlight.
#[rustfmt::skip]
pub(crate) const FACE_COLORS: [[f32; 3]; 8] = [
    [0.8, 0.8, 0.0],
    [0.0, 0.8, 0.8],
    [0.8, 0.0, 0.8],
    [0.8, 0.3, 0.0],
    [0.0, 0.8, 0.0],
    [0.0, 0.0, 0.8],
    [0.8, 0.8, 0.8],
    [0.8, 0.0, 0.0],
];

/// Color-buffer slot for the face 0 diagonal marker.
pub(crate) const MARKER_COLOR_SLOT: u32 = 6;
/// Color-buffer slot for selection wireframes.
pub(crate) const HIGHLIGHT_COLOR_SLOT: u32 = 7;

/// Two triangles per face, plus a 2-index diagonal marker across face 0
/// drawn with the line pipeline.
#[rustfmt::skip]
pub(crate) const BASE_INDICES: [u16; 38] = [
     0,  1,  2,  0,  2,  3,
     4,  5,  6,  4,  6,  7,
     8,  9, 10,  8, 10, 11,
    12, 13, 14, 12, 14, 15,
    16, 17, 18, 16, 18, 19,
    20, 21, 22, 20, 22, 23,
     0,  2,
];

/// Allocated index-buffer entries; the region past `BASE_INDICES` is
/// rewritten per frame with selection wireframes.
pub(crate) const INDEX_CAPACITY: usize = 64;
/// First index-buffer slot of the rewritable highlight region.
pub(crate) const HIGHLIGHT_INDEX_OFFSET: usize = BASE_INDICES.len();

/// In-plane sides of a face plus the two roles only a folded cube has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Left = 0,
    Right = 1,
    Top = 2,
    Bottom = 3,
    Front = 4,
    Back = 5,
}

impl Direction {
    /// The four directions that exist on the flat net.
    pub(crate) const IN_PLANE: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Front => Direction::Back,
            Direction::Back => Direction::Front,
        }
    }
}

/// Vertex index range owned by a face.
pub(crate) fn face_vertices(face: usize) -> std::ops::Range<usize> {
    face * VERTS_PER_FACE..(face + 1) * VERTS_PER_FACE
}

/// Classifies the four sides of a face from the live vertex positions.
///
/// The face's vertex indices are sorted by X to split them into left and
/// right columns, then each column is ordered by Y. Indexed by
/// `Direction::index()`: left and right run bottom-to-top, top and bottom
/// run left-to-right. The face must be an axis-aligned square in its plane;
/// the ordering is unspecified otherwise.
pub(crate) fn edges_of(vertices: &[Point3<f32>], face: usize) -> [[usize; 2]; 4] {
    let start = face * VERTS_PER_FACE;
    let mut ids = [start, start + 1, start + 2, start + 3];
    ids.sort_unstable_by(|&a, &b| vertices[a].x.total_cmp(&vertices[b].x));

    let [mut left_bottom, mut left_top] = [ids[0], ids[1]];
    if vertices[left_bottom].y > vertices[left_top].y {
        std::mem::swap(&mut left_bottom, &mut left_top);
    }

    let [mut right_bottom, mut right_top] = [ids[2], ids[3]];
    if vertices[right_bottom].y > vertices[right_top].y {
        std::mem::swap(&mut right_bottom, &mut right_top);
    }

    [
        [left_bottom, left_top],
        [right_bottom, right_top],
        [left_top, right_top],
        [left_bottom, right_bottom],
    ]
}

/// Line-list indices outlining one face, for the selection highlight.
pub(crate) fn wireframe_indices(face: usize) -> [u16; 8] {
    let base = (face * VERTS_PER_FACE) as u16;
    [
        base,
        base + 1,
        base + 1,
        base + 2,
        base + 2,
        base + 3,
        base + 3,
        base,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_classify_the_initial_face_zero() {
        let edges = edges_of(&NET_VERTICES, 0);
        assert_eq!(edges[Direction::Left.index()], [0, 3]);
        assert_eq!(edges[Direction::Right.index()], [1, 2]);
        assert_eq!(edges[Direction::Top.index()], [3, 2]);
        assert_eq!(edges[Direction::Bottom.index()], [0, 1]);
    }

    #[test]
    fn edges_cover_each_face_vertex_exactly_twice() {
        for face in 0..FACE_COUNT {
            let edges = edges_of(&NET_VERTICES, face);
            let mut counts = [0usize; VERTEX_COUNT];
            for [a, b] in edges {
                assert_ne!(a, b);
                counts[a] += 1;
                counts[b] += 1;
            }
            for id in face_vertices(face) {
                assert_eq!(counts[id], 2, "vertex {id} of face {face}");
            }
        }
    }

    #[test]
    fn edges_track_a_moved_face() {
        // Shift face 0 up a row; classification follows the coordinates.
        let mut vertices = NET_VERTICES;
        for id in face_vertices(0) {
            vertices[id].y += 2.0;
        }
        let edges = edges_of(&vertices, 0);
        assert_eq!(edges[Direction::Left.index()], [0, 3]);
        assert_eq!(edges[Direction::Bottom.index()], [0, 1]);
    }

    #[test]
    fn wireframe_closes_the_loop() {
        assert_eq!(wireframe_indices(2), [8, 9, 9, 10, 10, 11, 11, 8]);
    }
}
