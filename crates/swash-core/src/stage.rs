//! The stage: scene graph, ticker, and tweens bound to one surface.
//!
//! Hosts drive it with [`Stage::frame`] and provide a [`Renderer`] that
//! knows how to put circles on their actual surface.

use crate::layout::CanvasSize;
use crate::model::{Color, NodeKind, SceneGraph};
use crate::ticker::Ticker;
use crate::tween::{Tween, Tweens};
use kurbo::{Point, Vec2};
use petgraph::graph::NodeIndex;

/// Drawing backend for [`Stage::draw`].
pub trait Renderer {
    fn clear(&mut self, size: CanvasSize);
    fn fill_circle(&mut self, center: Point, radius: f64, fill: Color);
}

/// What [`crate::animator::GridAnimator`] needs from a scene/animation
/// engine. [`Stage`] is the real one; tests can swap in a recorder.
pub trait AnimationEngine {
    fn set_fps(&mut self, fps: f64);
    fn scene(&mut self) -> &mut SceneGraph;
    fn add_tween(&mut self, tween: Tween);
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub graph: SceneGraph,
    pub ticker: Ticker,
    pub tweens: Tweens,
    size: CanvasSize,
}

impl Stage {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            graph: SceneGraph::new(),
            ticker: Ticker::default(),
            tweens: Tweens::new(),
            size,
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Track the surface size so `clear` covers all of it.
    pub fn set_size(&mut self, size: CanvasSize) {
        self.size = size;
    }

    /// Advance animation state by `dt_ms`.
    pub fn update(&mut self, dt_ms: f64) {
        self.tweens.tick(&mut self.graph, dt_ms);
    }

    /// Paint the whole graph, back to front.
    pub fn draw<R: Renderer>(&self, renderer: &mut R) {
        renderer.clear(self.size);
        self.draw_node(renderer, self.graph.root, Vec2::ZERO);
    }

    fn draw_node<R: Renderer>(&self, renderer: &mut R, idx: NodeIndex, parent_origin: Vec2) {
        let Some(node) = self.graph.get(idx) else {
            return;
        };
        let here = parent_origin + node.position.to_vec2();

        if let NodeKind::Circle { radius } = node.kind
            && let Some(fill) = node.fill
        {
            log::trace!("PAINT circle r={radius} at {:?}", here);
            renderer.fill_circle(here.to_point(), radius, fill);
        }

        for child in self.graph.children(idx) {
            self.draw_node(renderer, child, here);
        }
    }

    /// One host callback: update and redraw if the ticker says a tick is
    /// due. Returns whether a frame was drawn.
    pub fn frame<R: Renderer>(&mut self, now_ms: f64, renderer: &mut R) -> bool {
        match self.ticker.poll(now_ms) {
            Some(dt) => {
                self.update(dt);
                self.draw(renderer);
                true
            }
            None => false,
        }
    }
}

impl AnimationEngine for Stage {
    fn set_fps(&mut self, fps: f64) {
        self.ticker.set_fps(fps);
    }

    fn scene(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    fn add_tween(&mut self, tween: Tween) {
        self.tweens.add(tween);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SceneNode;
    use crate::tween::TweenOptions;

    #[derive(Default)]
    struct Recorder {
        clears: usize,
        circles: Vec<(Point, f64)>,
    }

    impl Renderer for Recorder {
        fn clear(&mut self, _size: CanvasSize) {
            self.clears += 1;
        }

        fn fill_circle(&mut self, center: Point, radius: f64, _fill: Color) {
            self.circles.push((center, radius));
        }
    }

    #[test]
    fn draw_uses_world_positions() {
        let mut stage = Stage::new(CanvasSize::new(100.0, 100.0));
        let group = stage.graph.add_node(stage.graph.root, SceneNode::container().at(10.0, 10.0));
        stage.graph.add_node(group, SceneNode::circle(3.0, Color::RED).at(5.0, 0.0));

        let mut rec = Recorder::default();
        stage.draw(&mut rec);
        assert_eq!(rec.clears, 1);
        assert_eq!(rec.circles, vec![(Point::new(15.0, 10.0), 3.0)]);
    }

    #[test]
    fn detached_nodes_are_not_drawn() {
        let mut stage = Stage::new(CanvasSize::default());
        stage.graph.add_detached(SceneNode::circle(3.0, Color::RED));
        let mut rec = Recorder::default();
        stage.draw(&mut rec);
        assert!(rec.circles.is_empty());
    }

    #[test]
    fn frame_only_draws_when_tick_due() {
        let mut stage = Stage::new(CanvasSize::default());
        let dot = stage.graph.add_node(stage.graph.root, SceneNode::circle(1.0, Color::RED));
        stage.add_tween(
            Tween::new(dot, Point::ORIGIN, Point::new(100.0, 0.0), 1000.0)
                .with_options(TweenOptions::PING_PONG),
        );

        let mut rec = Recorder::default();
        assert!(!stage.frame(0.0, &mut rec));
        assert!(!stage.frame(4.0, &mut rec));
        assert!(stage.frame(100.0, &mut rec));
        assert_eq!(rec.clears, 1);
        assert_eq!(rec.circles, vec![(Point::new(10.0, 0.0), 1.0)]);
    }

    #[test]
    fn paused_ticker_holds_the_tween_in_place() {
        let mut stage = Stage::new(CanvasSize::default());
        let dot = stage.graph.add_node(stage.graph.root, SceneNode::circle(1.0, Color::RED));
        stage.add_tween(
            Tween::new(dot, Point::ORIGIN, Point::new(100.0, 0.0), 1000.0)
                .with_options(TweenOptions::PING_PONG),
        );

        let mut rec = Recorder::default();
        stage.frame(0.0, &mut rec);
        assert!(stage.frame(100.0, &mut rec));

        stage.ticker.set_paused(true);
        assert!(!stage.frame(5000.0, &mut rec));
        stage.ticker.set_paused(false);
        assert!(!stage.frame(5000.0, &mut rec));
        assert!(stage.frame(5100.0, &mut rec));
        assert_eq!(stage.graph.position(dot), Some(Point::new(20.0, 0.0)));
    }
}
