//! Main application state and logic for the folding cube.
//!
//! `CubeApp` owns the 24 live vertex positions, the pending animation
//! queue, and the mode flags, and advances the whole model one frame at a
//! time. The render layer never touches vertex data directly; every
//! mutation is pushed through the `VertexSink` handed to each call.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use nalgebra::{Point3, Vector3};

use crate::adjacency;
use crate::animation::{
    self, Animation, AnimationClock, DEGREES_PER_SECOND, STEP_MS, VertexSink,
};
use crate::cube::{self, Direction, NET_VERTICES};
use crate::math;

/// Which translation to apply before or instead of an animation plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Recenter {
    /// Clamp the flat net back into the visible area (the `R` key).
    View,
    /// Put face 0's bottom-left corner at (0, -1, 0) before folding.
    Fold,
    /// Shift the folded cube left before opening it.
    Open,
}

/// Wireframe highlight the renderer should draw this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Highlight {
    None,
    One(usize),
    Pair(usize, usize),
}

/// The folding-cube controller: geometry, animation queue, and mode flags.
pub(crate) struct CubeApp {
    vertices: Vec<Point3<f32>>,
    /// Interpolated positions of the step in flight; copied from
    /// `vertices` when a step starts and rounded back in on completion.
    moved: Vec<Point3<f32>>,
    queue: VecDeque<Animation>,
    clock: AnimationClock,
    moving: bool,
    is_2d: bool,
    /// Folded-cube display mode: tilts the view until the next unfold
    /// finishes.
    rotating: bool,
    paused: bool,
    /// The running step came from a user roll, so both selected faces stay
    /// highlighted while it plays.
    interactive: bool,
    selected: [usize; 2],
    clicks: usize,
}

impl CubeApp {
    pub(crate) fn new() -> Self {
        Self {
            vertices: NET_VERTICES.to_vec(),
            moved: NET_VERTICES.to_vec(),
            queue: VecDeque::new(),
            clock: AnimationClock::default(),
            moving: false,
            is_2d: true,
            rotating: false,
            paused: false,
            interactive: false,
            selected: [0; 2],
            clicks: 0,
        }
    }

    /// Two warm-up rolls played on launch.
    pub(crate) fn queue_opening_moves(&mut self) {
        self.queue.push_back(Animation {
            face_ids: vec![4],
            axis: Animation::Z_AXIS,
            pivot: self.vertices[16],
            clockwise: false,
            interactive: false,
        });
        self.queue.push_back(Animation {
            face_ids: vec![3, 5],
            axis: Animation::Z_AXIS,
            pivot: self.vertices[12],
            clockwise: true,
            interactive: false,
        });
    }

    pub(crate) fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Whether the folded-cube display tilt is active.
    pub(crate) fn rotating(&self) -> bool {
        self.rotating
    }

    /// Picking is only live on the flat net with nothing queued.
    pub(crate) fn ready_to_pick(&self) -> bool {
        self.is_2d && self.queue.is_empty()
    }

    pub(crate) fn highlight(&self) -> Highlight {
        if self.clicks == 1 {
            Highlight::One(self.selected[0])
        } else if self.interactive {
            Highlight::Pair(self.selected[0], self.selected[1])
        } else {
            Highlight::None
        }
    }

    /// Space: queue the fold or unfold plan. Ignored while animations are
    /// pending. The flat/folded flag flips as soon as the plan is queued.
    pub(crate) fn toggle_fold(&mut self, sink: &mut dyn VertexSink) {
        if !self.queue.is_empty() {
            return;
        }
        if self.is_2d {
            let infos = adjacency::compute_adjacency(&self.vertices);
            self.recenter(Recenter::Fold, sink);
            self.queue
                .extend(animation::plan_fold(&self.vertices, &infos));
            self.rotating = true;
        } else {
            let face_ids = adjacency::cube_face_ids(&self.vertices);
            self.recenter(Recenter::Open, sink);
            self.queue.extend(animation::plan_unfold(&face_ids));
        }
        self.is_2d = !self.is_2d;
    }

    /// R: recenter the flat net. Only valid in 2D with nothing queued.
    pub(crate) fn recenter_in_view(&mut self, sink: &mut dyn VertexSink) {
        if self.is_2d && self.queue.is_empty() {
            self.recenter(Recenter::View, sink);
        }
    }

    /// S: freeze or resume the animation clock.
    pub(crate) fn toggle_pause(&mut self, now: Instant) {
        self.paused = !self.paused;
        if self.paused {
            self.clock.suspend(now);
        } else {
            self.clock.resume(now);
        }
    }

    /// Excludes a period with no delivered frames (minimized window) from
    /// the running step, so the animation resumes where it left off.
    pub(crate) fn exclude_stall(&mut self, gap: Duration) {
        if !self.paused {
            self.clock.exclude(gap);
        }
    }

    /// Records a picked face. The first click marks it; a second click on a
    /// different face asks the planner for a roll joining the two, queueing
    /// it on success and logging the rejection otherwise. Either way the
    /// selection resets for the next attempt.
    pub(crate) fn select_face(&mut self, face: usize) {
        if self.clicks == 1 && face == self.selected[0] {
            return;
        }
        self.selected[self.clicks] = face;
        self.clicks = (self.clicks + 1) % 2;
        if self.clicks != 0 {
            return;
        }

        let infos = adjacency::compute_adjacency(&self.vertices);
        match animation::plan_connect(&self.vertices, &infos, self.selected[0], self.selected[1]) {
            Ok(plan) => {
                log::debug!(
                    "queued {} roll steps to bring face {} beside face {}",
                    plan.len(),
                    self.selected[0],
                    self.selected[1]
                );
                self.queue.extend(plan);
            }
            Err(why) => {
                log::error!(
                    "cannot join face {} with face {}: {}",
                    self.selected[0],
                    self.selected[1],
                    why
                );
            }
        }
    }

    /// Advances the head animation one frame, writing interpolated or
    /// settled positions to the sink.
    pub(crate) fn tick(&mut self, now: Instant, sink: &mut dyn VertexSink) {
        if self.paused {
            return;
        }
        let Some(animation) = self.queue.front().cloned() else {
            if self.rotating && self.is_2d {
                // The unfold just drained; drop the cube display tilt.
                self.rotating = false;
            }
            return;
        };

        if !self.moving {
            self.moving = true;
            self.interactive = animation.interactive;
            self.clock.begin(now);
            self.moved.copy_from_slice(&self.vertices);
        }

        let elapsed = self.clock.elapsed_ms(now);
        if elapsed == 0 {
            return;
        }

        if elapsed > STEP_MS {
            // The last interpolated frame sits within tolerance of the
            // exact quarter-turn pose; snapping it to integers removes any
            // accumulated float error before the next plan reads it.
            self.moving = false;
            self.interactive = false;
            self.clock.finish();
            for &face in &animation.face_ids {
                for id in cube::face_vertices(face) {
                    let m = &self.moved[id];
                    self.vertices[id] = Point3::new(m.x.round(), m.y.round(), m.z.round());
                }
            }
            sink.write(&self.vertices);
            self.queue.pop_front();
        } else {
            let spin = if animation.clockwise { -1.0 } else { 1.0 };
            let angle = spin * (elapsed as f32 / 1000.0) * DEGREES_PER_SECOND.to_radians();
            let transform = math::rotation_about(&animation.pivot, &animation.axis, angle);
            for &face in &animation.face_ids {
                for id in cube::face_vertices(face) {
                    self.moved[id] = transform.transform_point(&self.vertices[id]);
                }
            }
            sink.write(&self.moved);
        }
    }

    fn recenter(&mut self, kind: Recenter, sink: &mut dyn VertexSink) {
        let shift = match kind {
            Recenter::Fold => {
                let edges = cube::edges_of(&self.vertices, 0);
                Point3::new(0.0, -1.0, 0.0) - self.vertices[edges[Direction::Left.index()][0]]
            }
            Recenter::Open => Vector3::new(-4.0, 0.0, 0.0),
            Recenter::View => {
                if !self.is_2d {
                    return;
                }
                let mut shift = Vector3::zeros();
                let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
                let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
                for v in &self.vertices {
                    min_x = min_x.min(v.x);
                    max_x = max_x.max(v.x);
                    min_y = min_y.min(v.y);
                    max_y = max_y.max(v.y);
                }
                if min_x < -4.0 {
                    shift.x = -4.0 - min_x;
                    debug_assert!(max_x < 4.0);
                } else if max_x > 4.0 {
                    shift.x = 4.0 - max_x;
                    debug_assert!(min_x > -4.0);
                }
                if min_y < -5.0 {
                    shift.y = -5.0 - min_y;
                    debug_assert!(max_y < 5.0);
                } else if max_y > 5.0 {
                    shift.y = 5.0 - max_y;
                    debug_assert!(min_y > -5.0);
                }
                shift
            }
        };

        if shift == Vector3::zeros() {
            return;
        }
        for v in &mut self.vertices {
            *v += shift;
        }
        sink.write(&self.vertices);
        log::debug!("recentered the net by ({}, {})", shift.x, shift.y);
    }
}
