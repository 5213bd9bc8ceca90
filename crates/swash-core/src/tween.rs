//! Position tweens.
//!
//! A tween interpolates one node's position from where it was when the
//! tween was created to a target. Looping tweens wrap their clock at the
//! duration; bouncing loops run every odd iteration backwards so the
//! motion ping-pongs without a jump.

use crate::model::SceneGraph;
use kurbo::Point;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Easing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in [0, 1] to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TweenOptions {
    /// Restart from the beginning when the duration elapses, forever.
    pub looping: bool,
    /// With `looping`, odd iterations play in reverse. Ignored otherwise.
    pub bounce: bool,
}

impl TweenOptions {
    pub const PING_PONG: TweenOptions = TweenOptions {
        looping: true,
        bounce: true,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: NodeIndex,
    pub from: Point,
    pub to: Point,
    pub duration_ms: f64,
    pub options: TweenOptions,
    pub easing: Easing,
    elapsed_ms: f64,
    finished: bool,
}

impl Tween {
    pub fn new(target: NodeIndex, from: Point, to: Point, duration_ms: f64) -> Self {
        Self {
            target,
            from,
            to,
            duration_ms,
            options: TweenOptions::default(),
            easing: Easing::default(),
            elapsed_ms: 0.0,
            finished: false,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: TweenOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// A looping tween never finishes.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Which iteration the clock is in (0 for the first pass).
    pub fn iteration(&self) -> u64 {
        if self.duration_ms <= 0.0 {
            return 0;
        }
        (self.elapsed_ms / self.duration_ms).floor() as u64
    }

    /// Move the clock forward and return the new position.
    pub fn advance(&mut self, dt_ms: f64) -> Point {
        if !self.finished {
            self.elapsed_ms += dt_ms.max(0.0);
        }
        if !self.options.looping && (self.duration_ms <= 0.0 || self.elapsed_ms >= self.duration_ms) {
            self.finished = true;
        }
        self.sample()
    }

    /// Position at the current clock without advancing it.
    pub fn sample(&self) -> Point {
        if self.duration_ms <= 0.0 {
            return self.to;
        }

        let cycles = self.elapsed_ms / self.duration_ms;
        let progress = if !self.options.looping {
            cycles.min(1.0)
        } else {
            let iteration = cycles.floor();
            let frac = cycles - iteration;
            let reversed = self.options.bounce && (iteration as u64) % 2 == 1;
            if reversed { 1.0 - frac } else { frac }
        };

        self.from.lerp(self.to, self.easing.apply(progress))
    }
}

/// Every running tween on a stage.
#[derive(Debug, Clone, Default)]
pub struct Tweens {
    active: Vec<Tween>,
}

impl Tweens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tween: Tween) {
        log::debug!(
            "tween {:?}: {:?} -> {:?} over {}ms ({:?})",
            tween.target,
            tween.from,
            tween.to,
            tween.duration_ms,
            tween.options
        );
        self.active.push(tween);
    }

    /// Advance every tween and write positions into the graph.
    /// Finished tweens and tweens whose node is gone are dropped.
    /// Returns how many nodes moved.
    pub fn tick(&mut self, graph: &mut SceneGraph, dt_ms: f64) -> usize {
        let mut moved = 0;
        self.active.retain_mut(|tween| {
            let pos = tween.advance(dt_ms);
            if !graph.set_position(tween.target, pos) {
                log::warn!("dropping tween for removed node {:?}", tween.target);
                return false;
            }
            moved += 1;
            !tween.is_finished()
        });
        moved
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tween> {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, SceneNode};

    fn ping_pong() -> Tween {
        Tween::new(
            NodeIndex::new(0),
            Point::new(-400.0, -200.0),
            Point::ORIGIN,
            1000.0,
        )
        .with_options(TweenOptions::PING_PONG)
    }

    #[test]
    fn linear_midpoint() {
        let mut t = ping_pong();
        assert_eq!(t.advance(500.0), Point::new(-200.0, -100.0));
    }

    #[test]
    fn bounce_reverses_on_odd_iterations() {
        let mut t = ping_pong();
        assert_eq!(t.advance(1000.0), Point::ORIGIN);
        assert_eq!(t.iteration(), 1);
        assert_eq!(t.advance(250.0), Point::new(-100.0, -50.0));
        assert_eq!(t.advance(750.0), Point::new(-400.0, -200.0));
        assert_eq!(t.advance(500.0), Point::new(-200.0, -100.0));
        assert!(!t.is_finished());
    }

    #[test]
    fn loop_without_bounce_restarts() {
        let mut t = ping_pong().with_options(TweenOptions {
            looping: true,
            bounce: false,
        });
        t.advance(1250.0);
        assert_eq!(t.sample(), Point::new(-300.0, -150.0));
    }

    #[test]
    fn one_shot_clamps_and_finishes() {
        let mut t = ping_pong().with_options(TweenOptions::default());
        assert_eq!(t.advance(5000.0), Point::ORIGIN);
        assert!(t.is_finished());
        assert_eq!(t.advance(100.0), Point::ORIGIN);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let mut t = Tween::new(NodeIndex::new(0), Point::new(5.0, 5.0), Point::ORIGIN, 0.0);
        assert_eq!(t.advance(0.0), Point::ORIGIN);
        assert!(t.is_finished());
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        for e in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
        }
        assert_eq!(Easing::EaseIn.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOut.apply(0.5), 0.75);
    }

    #[test]
    fn tick_writes_positions_and_drops_finished() {
        let mut sg = SceneGraph::new();
        let dot = sg.add_node(sg.root, SceneNode::circle(1.0, Color::RED).at(10.0, 0.0));
        let mut tweens = Tweens::new();
        tweens.add(Tween::new(dot, Point::new(10.0, 0.0), Point::ORIGIN, 100.0));

        assert_eq!(tweens.tick(&mut sg, 50.0), 1);
        assert_eq!(sg.position(dot), Some(Point::new(5.0, 0.0)));
        tweens.tick(&mut sg, 50.0);
        assert_eq!(sg.position(dot), Some(Point::ORIGIN));
        assert!(tweens.is_empty());
    }

    #[test]
    fn tick_drops_tweens_for_removed_nodes() {
        let mut sg = SceneGraph::new();
        let dot = sg.add_node(sg.root, SceneNode::circle(1.0, Color::RED));
        let mut tweens = Tweens::new();
        tweens.add(Tween::new(dot, Point::ORIGIN, Point::new(1.0, 1.0), 10.0).with_options(TweenOptions::PING_PONG));
        sg.graph.remove_node(dot);
        assert_eq!(tweens.tick(&mut sg, 1.0), 0);
        assert_eq!(tweens.len(), 0);
    }
}
