//! Animation records and the planners that produce them.
//!
//! A fold, unfold, or interactive roll is expressed as a FIFO queue of
//! `Animation` records, each describing exactly one quarter turn of a face
//! group about a pivot. The planners here only build the records; `CubeApp`
//! owns the queue and drives the head record forward in time.

use std::time::{Duration, Instant};

use nalgebra::{Point3, Vector3};
use thiserror::Error;

use crate::adjacency::{self, FaceInfo};
use crate::cube::{self, Direction, FACE_COUNT};
use crate::math::{self, COORD_TOLERANCE};

/// Nominal duration of one queued step, in milliseconds.
pub(crate) const STEP_MS: u64 = 3000;

/// Rotation rate in degrees per second of animated time. Together with
/// `STEP_MS` every step is exactly a quarter turn, which is why a long roll
/// is queued as several records instead of one wider angle.
pub(crate) const DEGREES_PER_SECOND: f32 = 30.0;

/// One queued rigid rotation of a face group.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Animation {
    /// Faces that move together this step.
    pub(crate) face_ids: Vec<usize>,
    pub(crate) axis: Vector3<f32>,
    pub(crate) pivot: Point3<f32>,
    pub(crate) clockwise: bool,
    /// Whether the step came from a user face-to-face roll; only affects
    /// which selection wireframes are drawn while it runs.
    pub(crate) interactive: bool,
}

impl Animation {
    pub(crate) const X_AXIS: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);
    pub(crate) const Y_AXIS: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
    pub(crate) const Z_AXIS: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);
}

/// Output sink for vertex updates. The render layer mirrors every write
/// into GPU-visible memory; tests substitute an in-memory recorder.
pub(crate) trait VertexSink {
    fn write(&mut self, vertices: &[Point3<f32>]);
}

/// Per-step wall clock with suspension support.
///
/// Pausing banks the animation time elapsed so far and the reference
/// instant restarts on resume, so suspended wall time never counts toward
/// step progress. Display stalls (no frames delivered) are excluded the
/// same way by shifting the reference instant past the gap.
#[derive(Debug, Default)]
pub(crate) struct AnimationClock {
    step_start: Option<Instant>,
    banked_ms: u64,
    suspended: bool,
}

impl AnimationClock {
    pub(crate) fn begin(&mut self, now: Instant) {
        self.step_start = Some(now);
        self.banked_ms = 0;
        self.suspended = false;
    }

    pub(crate) fn elapsed_ms(&self, now: Instant) -> u64 {
        let running = self
            .step_start
            .map(|start| now.saturating_duration_since(start).as_millis() as u64)
            .unwrap_or(0);
        self.banked_ms + running
    }

    /// Banks progress so far; wall time until `resume` will not count.
    pub(crate) fn suspend(&mut self, now: Instant) {
        if let Some(start) = self.step_start.take() {
            self.banked_ms += now.saturating_duration_since(start).as_millis() as u64;
            self.suspended = true;
        }
    }

    pub(crate) fn resume(&mut self, now: Instant) {
        if self.suspended {
            self.step_start = Some(now);
            self.suspended = false;
        }
    }

    /// Shifts a frameless gap out of the running step.
    pub(crate) fn exclude(&mut self, gap: Duration) {
        if let Some(start) = &mut self.step_start {
            *start += gap;
        }
    }

    pub(crate) fn finish(&mut self) {
        self.step_start = None;
        self.banked_ms = 0;
        self.suspended = false;
    }
}

/// Why a two-face selection cannot be joined.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConnectError {
    #[error("the selected faces do not line up along either axis")]
    NotAligned,
    #[error("face {face} has nothing to roll over on its {side:?} side")]
    NotConnected { face: usize, side: Direction },
}

/// Plans the 2D -> 3D fold: one quarter turn per adjacency edge of each
/// directional chain out of face 0.
///
/// Chains are consumed in reverse discovery order while a per-face group
/// list accumulates, so the faces beyond each crease are fully grouped
/// before the crease closer to face 0 is queued. Left and right creases
/// turn about Y, top and bottom about X; the pivot is the shared edge's
/// reference corner read from the live (already recentered) positions.
///
/// `infos` may predate a pure translation of `vertices`: edge indices are
/// translation invariant while pivots read the current coordinates.
pub(crate) fn plan_fold(
    vertices: &[Point3<f32>],
    infos: &[FaceInfo; FACE_COUNT],
) -> Vec<Animation> {
    let mut plan = Vec::new();

    for direction in Direction::IN_PLANE {
        let chain = adjacency::collect_chain(infos, 0, direction);
        let mut groups: [Vec<usize>; FACE_COUNT] = Default::default();

        for link in chain.iter().rev() {
            groups[link.to].push(link.to);
            let subtree = groups[link.to].clone();
            groups[link.from].extend_from_slice(&subtree);

            let (axis, clockwise) = match link.direction {
                Direction::Left => (Animation::Y_AXIS, true),
                Direction::Right => (Animation::Y_AXIS, false),
                Direction::Top => (Animation::X_AXIS, true),
                Direction::Bottom => (Animation::X_AXIS, false),
                Direction::Front | Direction::Back => {
                    unreachable!("net chains stay in the plane")
                }
            };

            plan.push(Animation {
                face_ids: subtree,
                axis,
                pivot: vertices[infos[link.from].edge(link.direction)[0]],
                clockwise,
                interactive: false,
            });
        }
    }

    plan
}

/// The fixed 3D -> 2D opening sequence.
///
/// Peels the canonical cube apart into the cross net: everything but the
/// front swings out, the bottom drops, the back/left/top arm swings again,
/// then the left and top faces unroll on their own. The groups, axes, and
/// pivots are constants tied to the pose the fold produces; `face_ids`
/// must come from `cube_face_ids` on that pose, resolved before the
/// pre-open translation.
pub(crate) fn plan_unfold(face_ids: &[usize; FACE_COUNT]) -> Vec<Animation> {
    let at = |direction: Direction| face_ids[direction.index()];
    let step = |face_ids: Vec<usize>, axis, pivot, clockwise| Animation {
        face_ids,
        axis,
        pivot,
        clockwise,
        interactive: false,
    };

    vec![
        step(
            vec![
                at(Direction::Bottom),
                at(Direction::Right),
                at(Direction::Back),
                at(Direction::Left),
                at(Direction::Top),
            ],
            Animation::Y_AXIS,
            Point3::new(-2.0, -1.0, 0.0),
            true,
        ),
        step(
            vec![at(Direction::Bottom)],
            Animation::X_AXIS,
            Point3::new(0.0, -1.0, 0.0),
            true,
        ),
        step(
            vec![
                at(Direction::Back),
                at(Direction::Left),
                at(Direction::Top),
            ],
            Animation::Y_AXIS,
            Point3::new(0.0, -1.0, 0.0),
            true,
        ),
        step(
            vec![at(Direction::Left)],
            Animation::Y_AXIS,
            Point3::new(2.0, 1.0, 0.0),
            true,
        ),
        step(
            vec![at(Direction::Top)],
            Animation::X_AXIS,
            Point3::new(2.0, 1.0, 0.0),
            false,
        ),
    ]
}

/// Faces whose four vertices all lie on one side of an axis boundary.
///
/// `along_x` picks the coordinate compared against `boundary` and `greater`
/// picks the side; a face straddling the boundary is never included.
pub(crate) fn half_plane_faces(
    vertices: &[Point3<f32>],
    boundary: f32,
    greater: bool,
    along_x: bool,
) -> Vec<usize> {
    (0..FACE_COUNT)
        .filter(|&face| {
            cube::face_vertices(face).all(|id| {
                let v = if along_x {
                    vertices[id].x
                } else {
                    vertices[id].y
                };
                if greater {
                    v >= boundary - COORD_TOLERANCE
                } else {
                    v <= boundary + COORD_TOLERANCE
                }
            })
        })
        .collect()
}

/// Plans the interactive roll that brings `first` edge-to-edge beside
/// `second`.
///
/// One of four alignment conditions must hold: a vertical side of `first`
/// shares its X with the facing side of `second` but not its Y, or a
/// horizontal side shares its Y but not its X. `first` must also actually
/// touch a neighbor on that side to roll over. The whole half-plane of
/// faces on `first`'s side of the boundary rolls together, one quarter
/// turn per two units of separation, with the pivot walking along the
/// boundary so every step turns about that step's meeting edge.
pub(crate) fn plan_connect(
    vertices: &[Point3<f32>],
    infos: &[FaceInfo; FACE_COUNT],
    first: usize,
    second: usize,
) -> Result<Vec<Animation>, ConnectError> {
    let mut rejection = None;

    for side in Direction::IN_PLANE {
        let anchor = vertices[infos[first].edge(side)[0]];
        let target = vertices[infos[second].edge(side.opposite())[0]];

        let vertical = matches!(side, Direction::Left | Direction::Right);
        let (align_a, align_b, perp_a, perp_b) = if vertical {
            (anchor.x, target.x, anchor.y, target.y)
        } else {
            (anchor.y, target.y, anchor.x, target.x)
        };

        if !math::nearly_equal(align_a, align_b) || math::nearly_equal(perp_a, perp_b) {
            continue;
        }

        if infos[first].neighbor(side).is_none() {
            rejection.get_or_insert(ConnectError::NotConnected { face: first, side });
            continue;
        }

        let greater = matches!(side, Direction::Left | Direction::Bottom);
        let group = half_plane_faces(vertices, align_a, greater, vertical);

        // Rolling toward the smaller perpendicular coordinate pivots on the
        // low edge endpoint and walks negative; the other way mirrors.
        let descending = perp_a > perp_b;
        let steps = (((perp_a - perp_b).abs() + COORD_TOLERANCE) / 2.0) as usize;
        let clockwise = match side {
            Direction::Left | Direction::Top => descending,
            Direction::Right | Direction::Bottom => !descending,
            Direction::Front | Direction::Back => unreachable!(),
        };
        let base = vertices[infos[first].edge(side)[if descending { 0 } else { 1 }]];
        let walk = if vertical {
            Vector3::new(0.0, if descending { -2.0 } else { 2.0 }, 0.0)
        } else {
            Vector3::new(if descending { -2.0 } else { 2.0 }, 0.0, 0.0)
        };

        return Ok((0..steps)
            .map(|i| Animation {
                face_ids: group.clone(),
                axis: Animation::Z_AXIS,
                pivot: base + walk * i as f32,
                clockwise,
                interactive: true,
            })
            .collect());
    }

    Err(rejection.unwrap_or(ConnectError::NotAligned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::compute_adjacency;
    use crate::cube::NET_VERTICES;
    use std::time::Duration;

    #[test]
    fn clock_excludes_suspended_time() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::default();
        clock.begin(t0);
        assert_eq!(clock.elapsed_ms(t0 + Duration::from_millis(1200)), 1200);

        clock.suspend(t0 + Duration::from_millis(1200));
        // Ten suspended seconds do not count.
        let resumed = t0 + Duration::from_millis(11_200);
        assert_eq!(clock.elapsed_ms(resumed), 1200);
        clock.resume(resumed);
        assert_eq!(clock.elapsed_ms(resumed + Duration::from_millis(300)), 1500);
    }

    #[test]
    fn clock_excludes_display_stalls() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::default();
        clock.begin(t0);
        clock.exclude(Duration::from_secs(10));
        assert_eq!(clock.elapsed_ms(t0 + Duration::from_millis(10_500)), 500);
    }

    #[test]
    fn clock_resume_without_suspend_is_inert() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::default();
        clock.begin(t0);
        clock.resume(t0 + Duration::from_millis(900));
        assert_eq!(clock.elapsed_ms(t0 + Duration::from_millis(1000)), 1000);
    }

    #[test]
    fn half_plane_splits_the_net_at_the_middle() {
        let right = half_plane_faces(&NET_VERTICES, 0.0, true, true);
        assert_eq!(right, vec![3, 4, 5]);
        let left = half_plane_faces(&NET_VERTICES, 0.0, false, true);
        assert_eq!(left, vec![0, 1, 2]);
    }

    #[test]
    fn half_plane_never_includes_straddlers() {
        // Faces 1 and 2 span x in [-2, 0] and straddle x = -1.
        let right = half_plane_faces(&NET_VERTICES, -1.0, true, true);
        assert_eq!(right, vec![3, 4, 5]);
        let left = half_plane_faces(&NET_VERTICES, -1.0, false, true);
        assert_eq!(left, vec![0]);
    }

    #[test]
    fn fold_plan_walks_the_right_chain_in_reverse() {
        let infos = compute_adjacency(&NET_VERTICES);
        let plan = plan_fold(&NET_VERTICES, &infos);

        assert_eq!(plan.len(), 5);
        // Reverse discovery order of the rightward chain.
        assert_eq!(plan[0].face_ids, vec![4]);
        assert_eq!(plan[1].face_ids, vec![5]);
        assert_eq!(plan[2].face_ids, vec![1]);
        assert_eq!(plan[3].face_ids, vec![4, 5, 3]);
        assert_eq!(plan[4].face_ids, vec![1, 4, 5, 3, 2]);

        // Top creases fold about X, side creases about Y.
        assert_eq!(plan[0].axis, Animation::X_AXIS);
        assert!(plan[0].clockwise);
        assert_eq!(plan[1].axis, Animation::Y_AXIS);
        assert!(!plan[1].clockwise);
        assert_eq!(plan[2].axis, Animation::X_AXIS);
        assert!(!plan[2].clockwise);

        // Pivot of the crease between face 0 and face 2 is face 0's
        // bottom-right corner.
        assert_eq!(plan[4].pivot, Point3::new(-2.0, -1.0, 0.0));
        assert!(plan.iter().all(|step| !step.interactive));
    }

    #[test]
    fn unfold_plan_is_the_fixed_five_step_sequence() {
        // Role order of the canonical fold result.
        let mut face_ids = [0usize; FACE_COUNT];
        face_ids[Direction::Front.index()] = 0;
        face_ids[Direction::Back.index()] = 3;
        face_ids[Direction::Left.index()] = 5;
        face_ids[Direction::Right.index()] = 2;
        face_ids[Direction::Top.index()] = 4;
        face_ids[Direction::Bottom.index()] = 1;

        let plan = plan_unfold(&face_ids);
        assert_eq!(plan.len(), 5);
        assert_eq!(plan[0].face_ids, vec![1, 2, 3, 5, 4]);
        assert_eq!(plan[1].face_ids, vec![1]);
        assert_eq!(plan[2].face_ids, vec![3, 5, 4]);
        assert_eq!(plan[3].face_ids, vec![5]);
        assert_eq!(plan[4].face_ids, vec![4]);

        assert_eq!(plan[0].pivot, Point3::new(-2.0, -1.0, 0.0));
        assert_eq!(plan[1].pivot, Point3::new(0.0, -1.0, 0.0));
        assert_eq!(plan[3].pivot, Point3::new(2.0, 1.0, 0.0));
        assert!(plan[0].clockwise && plan[3].clockwise);
        assert!(!plan[4].clockwise);
        assert_eq!(plan[4].axis, Animation::X_AXIS);
    }

    #[test]
    fn connect_rolls_face_four_down_to_face_zero() {
        let infos = compute_adjacency(&NET_VERTICES);
        // Face 4 sits above face 3; its bottom edge shares y = 1 with face
        // 0's top edge four units away.
        let plan = plan_connect(&NET_VERTICES, &infos, 4, 0).expect("legal roll");

        assert_eq!(plan.len(), 2);
        for step in &plan {
            assert_eq!(step.face_ids, vec![4]);
            assert_eq!(step.axis, Animation::Z_AXIS);
            assert!(!step.clockwise);
            assert!(step.interactive);
        }
        // The pivot walks leftward along the boundary, one square per step.
        assert_eq!(plan[0].pivot, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(plan[1].pivot, Point3::new(-2.0, 1.0, 0.0));
    }

    #[test]
    fn connect_rolls_face_one_under_face_five() {
        let infos = compute_adjacency(&NET_VERTICES);
        let plan = plan_connect(&NET_VERTICES, &infos, 1, 5).expect("legal roll");

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].face_ids, vec![1]);
        assert!(!plan[0].clockwise);
        assert_eq!(plan[0].pivot, Point3::new(0.0, -1.0, 0.0));
        assert_eq!(plan[1].pivot, Point3::new(2.0, -1.0, 0.0));
    }

    #[test]
    fn connect_single_clockwise_step() {
        let infos = compute_adjacency(&NET_VERTICES);
        // Face 1 under face 0: one quarter turn leftward.
        let plan = plan_connect(&NET_VERTICES, &infos, 1, 0).expect("legal roll");
        assert_eq!(plan.len(), 1);
        assert!(plan[0].clockwise);
        assert_eq!(plan[0].pivot, Point3::new(-2.0, -1.0, 0.0));
    }

    #[test]
    fn connect_rejects_a_face_with_no_neighbor_to_roll_over() {
        let infos = compute_adjacency(&NET_VERTICES);
        // Face 5's bottom edge lines up with face 1's top edge, but face 5
        // touches nothing below itself.
        let err = plan_connect(&NET_VERTICES, &infos, 5, 1).unwrap_err();
        assert_eq!(
            err,
            ConnectError::NotConnected {
                face: 5,
                side: Direction::Bottom
            }
        );
    }

    #[test]
    fn connect_rejects_unaligned_faces() {
        let infos = compute_adjacency(&NET_VERTICES);
        // Faces 0 and 3 share a row, so every aligned pair of sides also
        // agrees on the perpendicular coordinate.
        assert_eq!(
            plan_connect(&NET_VERTICES, &infos, 0, 3),
            Err(ConnectError::NotAligned)
        );
    }
}
