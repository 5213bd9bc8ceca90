//! Staggered circle background.
//!
//! [`GridAnimator::initialize`] sizes the surface to the viewport, builds
//! the pattern, centers it, attaches it to the stage, and starts an endless
//! ping-pong tween toward the origin. After that only the pattern position
//! changes; the host re-applies the viewport width on resize through
//! [`GridAnimator::resize`].

use crate::error::{Result, SwashError};
use crate::layout::{CanvasSize, GridConfig, PatternLayout, build_pattern};
use crate::stage::AnimationEngine;
use crate::tween::{Tween, TweenOptions};
use kurbo::Point;
use petgraph::graph::NodeIndex;

/// The pixel surface the background is drawn on.
pub trait DrawingSurface {
    fn size(&self) -> CanvasSize;

    /// Only the width follows the viewport; height is fixed at creation.
    fn set_width(&mut self, width: f64);

    /// Whether the surface is bound to a live display context.
    fn is_attached(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridAnimator {
    pattern: NodeIndex,
    layout: PatternLayout,
    config: GridConfig,
}

impl GridAnimator {
    pub fn initialize<S, E>(surface: &mut S, viewport_width: f64, engine: Option<&mut E>) -> Result<Self>
    where
        S: DrawingSurface + ?Sized,
        E: AnimationEngine + ?Sized,
    {
        Self::initialize_with_config(surface, viewport_width, engine, GridConfig::default())
    }

    pub fn initialize_with_config<S, E>(
        surface: &mut S,
        viewport_width: f64,
        engine: Option<&mut E>,
        config: GridConfig,
    ) -> Result<Self>
    where
        S: DrawingSurface + ?Sized,
        E: AnimationEngine + ?Sized,
    {
        let Some(engine) = engine else {
            log::warn!("no animation engine; background not started");
            return Err(SwashError::MissingRuntimeDependency { name: "animation engine" });
        };
        if !surface.is_attached() {
            log::warn!("drawing surface has no display context; background not started");
            return Err(SwashError::MissingRuntimeDependency { name: "display context" });
        }

        surface.set_width(viewport_width);
        engine.set_fps(config.fps);

        let canvas = surface.size();
        let layout = PatternLayout::for_canvas(canvas, &config);

        let scene = engine.scene();
        let pattern = build_pattern(scene, canvas, &config);
        let root = scene.root;
        scene.attach(pattern, root);

        let tween = Tween::new(pattern, layout.origin, Point::ORIGIN, config.tween_duration_ms)
            .with_options(TweenOptions::PING_PONG);
        engine.add_tween(tween);

        log::info!(
            "background started: {} rows x {} circles on {}x{}",
            layout.rows,
            layout.circles_per_row,
            canvas.width,
            canvas.height
        );

        Ok(Self {
            pattern,
            layout,
            config,
        })
    }

    /// Viewport resize: rewrite the surface width, nothing else.
    pub fn resize<S: DrawingSurface + ?Sized>(&self, surface: &mut S, viewport_width: f64) {
        log::debug!("resize surface width to {viewport_width}");
        surface.set_width(viewport_width);
    }

    pub fn pattern(&self) -> NodeIndex {
        self.pattern
    }

    pub fn layout(&self) -> &PatternLayout {
        &self.layout
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }
}
