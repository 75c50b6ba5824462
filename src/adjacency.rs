//! Geometric face adjacency derived from live vertex positions.
//!
//! Adjacency here is positional, not topological: two faces are neighbors
//! when one side of the first coincides with the opposite side of the
//! second within tolerance. Nothing is cached; the full scan is 36 edge
//! comparisons and the geometry changes after every completed animation.

use std::collections::VecDeque;

use nalgebra::Point3;

use crate::cube::{self, Direction, FACE_COUNT};
use crate::math;

/// Per-face neighbor table plus the classified edges it was derived from.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FaceInfo {
    neighbors: [Option<usize>; 4],
    edges: [[usize; 2]; 4],
}

impl FaceInfo {
    pub(crate) fn neighbor(&self, direction: Direction) -> Option<usize> {
        self.neighbors[direction.index()]
    }

    /// Vertex-index pair of one side; endpoints ordered as `edges_of`
    /// produces them.
    pub(crate) fn edge(&self, direction: Direction) -> [usize; 2] {
        self.edges[direction.index()]
    }
}

/// Builds the neighbor tables for all six faces.
///
/// For every ordered pair of distinct faces, each side of the first is
/// matched endpoint-for-endpoint against the facing side of the second.
/// Faces are planar and non-overlapping by construction, so at most one
/// face matches per side.
pub(crate) fn compute_adjacency(vertices: &[Point3<f32>]) -> [FaceInfo; FACE_COUNT] {
    let mut infos = [FaceInfo::default(); FACE_COUNT];
    for (face, info) in infos.iter_mut().enumerate() {
        info.edges = cube::edges_of(vertices, face);
    }

    const FACING: [(Direction, Direction); 4] = [
        (Direction::Left, Direction::Right),
        (Direction::Right, Direction::Left),
        (Direction::Top, Direction::Bottom),
        (Direction::Bottom, Direction::Top),
    ];

    for i in 0..FACE_COUNT {
        for j in 0..FACE_COUNT {
            if i == j {
                continue;
            }
            for (mine, theirs) in FACING {
                let [a0, a1] = infos[i].edge(mine);
                let [b0, b1] = infos[j].edge(theirs);
                if math::same_point(&vertices[a0], &vertices[b0])
                    && math::same_point(&vertices[a1], &vertices[b1])
                {
                    infos[i].neighbors[mine.index()] = Some(j);
                    break;
                }
            }
        }
    }

    infos
}

/// One discovered step of a directional face chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChainLink {
    pub(crate) from: usize,
    pub(crate) to: usize,
    pub(crate) direction: Direction,
}

/// Collects the connected chain of faces on `direction`'s side of `start`.
///
/// Breadth-first over the neighbor tables: from each visited face every
/// in-plane neighbor is followed except the face it was reached from. The
/// discovery order is load-bearing: fold planning consumes it in reverse
/// so a subtree's group is assembled before any group that contains it. On
/// a proper net this terminates after at most five links.
pub(crate) fn collect_chain(
    infos: &[FaceInfo; FACE_COUNT],
    start: usize,
    direction: Direction,
) -> Vec<ChainLink> {
    let mut links = Vec::new();
    let mut pending = VecDeque::new();

    if let Some(first) = infos[start].neighbor(direction) {
        pending.push_back(ChainLink {
            from: start,
            to: first,
            direction,
        });
    }

    while let Some(link) = pending.pop_front() {
        links.push(link);
        for side in Direction::IN_PLANE {
            if let Some(next) = infos[link.to].neighbor(side) {
                if next != link.from {
                    pending.push_back(ChainLink {
                        from: link.to,
                        to: next,
                        direction: side,
                    });
                }
            }
        }
    }

    links
}

/// Assigns cube roles to the faces of the canonical folded pose: front face
/// at z = 0 spanning x in [0, 2], y in [-1, 1], the rest closing the box
/// behind it.
///
/// Face 0 is always the front. The unfold sequence is hand-composed for
/// exactly this pose, so a face that fits no role is a logic fault rather
/// than a recoverable condition.
pub(crate) fn cube_face_ids(vertices: &[Point3<f32>]) -> [usize; FACE_COUNT] {
    let mut roles: [Option<usize>; FACE_COUNT] = [None; FACE_COUNT];
    roles[Direction::Front.index()] = Some(0);

    for face in 1..FACE_COUNT {
        let role = if face_in_plane(vertices, face, |v| v.z + 2.0) {
            Direction::Back
        } else if face_in_plane(vertices, face, |v| v.x) {
            Direction::Left
        } else if face_in_plane(vertices, face, |v| v.x - 2.0) {
            Direction::Right
        } else if face_in_plane(vertices, face, |v| v.y - 1.0) {
            Direction::Top
        } else if face_in_plane(vertices, face, |v| v.y + 1.0) {
            Direction::Bottom
        } else {
            continue;
        };
        roles[role.index()] = Some(face);
    }

    roles.map(|role| role.expect("folded cube should expose one face per side"))
}

fn face_in_plane(
    vertices: &[Point3<f32>],
    face: usize,
    offset: impl Fn(&Point3<f32>) -> f32,
) -> bool {
    cube::face_vertices(face).all(|id| offset(&vertices[id]).abs() <= math::COORD_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::NET_VERTICES;
    use nalgebra::Point3;

    #[test]
    fn initial_net_neighbors() {
        let infos = compute_adjacency(&NET_VERTICES);

        assert_eq!(infos[0].neighbor(Direction::Right), Some(2));
        assert_eq!(infos[0].neighbor(Direction::Left), None);
        assert_eq!(infos[0].neighbor(Direction::Top), None);
        assert_eq!(infos[0].neighbor(Direction::Bottom), None);

        assert_eq!(infos[2].neighbor(Direction::Left), Some(0));
        assert_eq!(infos[2].neighbor(Direction::Right), Some(3));
        assert_eq!(infos[2].neighbor(Direction::Bottom), Some(1));

        assert_eq!(infos[3].neighbor(Direction::Right), Some(5));
        assert_eq!(infos[3].neighbor(Direction::Top), Some(4));

        assert_eq!(infos[1].neighbor(Direction::Top), Some(2));
        assert_eq!(infos[4].neighbor(Direction::Bottom), Some(3));
        assert_eq!(infos[5].neighbor(Direction::Left), Some(3));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let infos = compute_adjacency(&NET_VERTICES);
        for face in 0..FACE_COUNT {
            for direction in Direction::IN_PLANE {
                if let Some(other) = infos[face].neighbor(direction) {
                    assert_eq!(
                        infos[other].neighbor(direction.opposite()),
                        Some(face),
                        "face {face} {direction:?} neighbor {other} does not point back"
                    );
                }
            }
        }
    }

    #[test]
    fn chain_from_face_zero_rightward() {
        let infos = compute_adjacency(&NET_VERTICES);
        let chain = collect_chain(&infos, 0, Direction::Right);
        let expected = [
            (0, 2, Direction::Right),
            (2, 3, Direction::Right),
            (2, 1, Direction::Bottom),
            (3, 5, Direction::Right),
            (3, 4, Direction::Top),
        ];
        assert_eq!(chain.len(), expected.len());
        for (link, (from, to, direction)) in chain.iter().zip(expected) {
            assert_eq!((link.from, link.to, link.direction), (from, to, direction));
        }
    }

    #[test]
    fn chains_in_other_directions_are_empty() {
        let infos = compute_adjacency(&NET_VERTICES);
        for direction in [Direction::Left, Direction::Top, Direction::Bottom] {
            assert!(collect_chain(&infos, 0, direction).is_empty());
        }
    }

    /// A canonical folded cube: front at z = 0 over x in [0, 2], faces in
    /// the role order front, bottom, right, back, top, left.
    fn folded_cube() -> Vec<Point3<f32>> {
        let quad = |a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]| {
            [a, b, c, d].map(|p| Point3::new(p[0], p[1], p[2]))
        };
        let mut vertices = Vec::with_capacity(24);
        // front (face 0)
        vertices.extend(quad(
            [0.0, -1.0, 0.0],
            [2.0, -1.0, 0.0],
            [2.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ));
        // bottom (face 1)
        vertices.extend(quad(
            [0.0, -1.0, 0.0],
            [2.0, -1.0, 0.0],
            [2.0, -1.0, -2.0],
            [0.0, -1.0, -2.0],
        ));
        // right (face 2)
        vertices.extend(quad(
            [2.0, -1.0, 0.0],
            [2.0, -1.0, -2.0],
            [2.0, 1.0, -2.0],
            [2.0, 1.0, 0.0],
        ));
        // back (face 3)
        vertices.extend(quad(
            [0.0, -1.0, -2.0],
            [2.0, -1.0, -2.0],
            [2.0, 1.0, -2.0],
            [0.0, 1.0, -2.0],
        ));
        // top (face 4)
        vertices.extend(quad(
            [0.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [2.0, 1.0, -2.0],
            [0.0, 1.0, -2.0],
        ));
        // left (face 5)
        vertices.extend(quad(
            [0.0, -1.0, 0.0],
            [0.0, -1.0, -2.0],
            [0.0, 1.0, -2.0],
            [0.0, 1.0, 0.0],
        ));
        vertices
    }

    #[test]
    fn folded_cube_roles_are_resolved() {
        let ids = cube_face_ids(&folded_cube());
        assert_eq!(ids[Direction::Front.index()], 0);
        assert_eq!(ids[Direction::Bottom.index()], 1);
        assert_eq!(ids[Direction::Right.index()], 2);
        assert_eq!(ids[Direction::Back.index()], 3);
        assert_eq!(ids[Direction::Top.index()], 4);
        assert_eq!(ids[Direction::Left.index()], 5);
    }

    #[test]
    #[should_panic(expected = "one face per side")]
    fn flat_net_has_no_cube_roles() {
        cube_face_ids(&NET_VERTICES);
    }
}
