//! Staggered circle pattern layout.
//!
//! The pattern is twice as wide and twice as tall as the canvas so the
//! bouncing translation never exposes an empty edge. Odd rows are shifted
//! by half the spacing to get a brick layout.

use crate::model::{Color, SceneGraph, SceneNode};
use kurbo::{Point, Size};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

pub const CIRCLE_RADIUS: f64 = 20.0;
pub const SPACING: f64 = 60.0;
pub const ROW_STAGGER: f64 = 30.0;
pub const GRID_FPS: f64 = 60.0;
pub const TWEEN_DURATION_MS: f64 = 1000.0;

/// Upper bound on circles per row and rows per pattern.
pub const MAX_COVER_COUNT: usize = 4096;

/// Pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    /// Browser default for a `<canvas>` without attributes.
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 150.0,
        }
    }
}

/// Layout and timing parameters for the background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub radius: f64,
    pub spacing: f64,
    pub stagger: f64,
    pub fill: Color,
    pub fps: f64,
    pub tween_duration_ms: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            radius: CIRCLE_RADIUS,
            spacing: SPACING,
            stagger: ROW_STAGGER,
            fill: Color::RED,
            fps: GRID_FPS,
            tween_duration_ms: TWEEN_DURATION_MS,
        }
    }
}

/// Number of steps `0, spacing, 2*spacing, …` that stay below `2 * extent`,
/// capped at [`MAX_COVER_COUNT`]. Non-finite or non-positive inputs give 0.
pub fn cover_count(extent: f64, spacing: f64) -> usize {
    if !(spacing.is_finite() && spacing > 0.0 && extent.is_finite() && extent > 0.0) {
        return 0;
    }
    let steps = (extent * 2.0 / spacing).ceil();
    if steps > MAX_COVER_COUNT as f64 {
        log::warn!("{steps} steps of {spacing}px for {extent}px; capping at {MAX_COVER_COUNT}");
        return MAX_COVER_COUNT;
    }
    steps as usize
}

/// Offset of row `index` inside the pattern.
pub fn row_offset(index: usize, config: &GridConfig) -> Point {
    let x = if index % 2 == 0 { 0.0 } else { config.stagger };
    Point::new(x, index as f64 * config.spacing)
}

/// Counts and placement of the pattern for one canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternLayout {
    pub rows: usize,
    pub circles_per_row: usize,
    /// Where the pattern sits before the tween starts.
    pub origin: Point,
}

impl PatternLayout {
    pub fn for_canvas(canvas: CanvasSize, config: &GridConfig) -> Self {
        Self {
            rows: cover_count(canvas.height, config.spacing),
            circles_per_row: cover_count(canvas.width, config.spacing),
            origin: Point::new(-canvas.width / 2.0, -canvas.height / 2.0),
        }
    }

    pub fn circle_count(&self) -> usize {
        self.rows * self.circles_per_row
    }

    /// Area spanned by circle centers, stagger included.
    pub fn extent(&self, config: &GridConfig) -> Size {
        let stagger = if self.rows > 1 { config.stagger } else { 0.0 };
        Size::new(
            self.circles_per_row as f64 * config.spacing + stagger,
            self.rows as f64 * config.spacing,
        )
    }
}

/// Build one row of circles as a detached container.
pub fn build_row(graph: &mut SceneGraph, count: usize, config: &GridConfig) -> NodeIndex {
    let row = graph.add_detached(SceneNode::container());
    for i in 0..count {
        let circle = SceneNode::circle(config.radius, config.fill).at(i as f64 * config.spacing, 0.0);
        graph.add_node(row, circle);
    }
    row
}

/// Build the full pattern as a detached container positioned at its
/// layout origin. The caller attaches it to the stage.
pub fn build_pattern(graph: &mut SceneGraph, canvas: CanvasSize, config: &GridConfig) -> NodeIndex {
    let layout = PatternLayout::for_canvas(canvas, config);
    log::debug!(
        "pattern {}x{} for canvas {}x{}",
        layout.circles_per_row,
        layout.rows,
        canvas.width,
        canvas.height
    );

    let pattern = graph.add_detached(SceneNode::container());
    for i in 0..layout.rows {
        let row = build_row(graph, layout.circles_per_row, config);
        graph.attach(row, pattern);
        graph.set_position(row, row_offset(i, config));
    }
    graph.set_position(pattern, layout.origin);
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_count_rounds_up() {
        assert_eq!(cover_count(800.0, 60.0), 27);
        assert_eq!(cover_count(400.0, 60.0), 14);
        assert_eq!(cover_count(300.0, 60.0), 10);
        assert_eq!(cover_count(0.0, 60.0), 0);
        assert_eq!(cover_count(100.0, 0.0), 0);
    }

    #[test]
    fn cover_count_rejects_degenerate_spacing() {
        assert_eq!(cover_count(800.0, f64::MIN_POSITIVE), MAX_COVER_COUNT);
        assert_eq!(cover_count(800.0, 1e-3), MAX_COVER_COUNT);
        assert_eq!(cover_count(800.0, f64::NAN), 0);
        assert_eq!(cover_count(800.0, f64::INFINITY), 0);
        assert_eq!(cover_count(f64::INFINITY, 60.0), 0);
        assert_eq!(cover_count(-5.0, 60.0), 0);
    }

    #[test]
    fn tiny_spacing_layout_is_capped() {
        let config = GridConfig {
            spacing: f64::MIN_POSITIVE,
            ..GridConfig::default()
        };
        let layout = PatternLayout::for_canvas(CanvasSize::new(2.0, 1e-300), &config);
        assert_eq!(layout.circles_per_row, MAX_COVER_COUNT);
        assert!(layout.rows <= MAX_COVER_COUNT);
    }

    #[test]
    fn rows_alternate_stagger() {
        let config = GridConfig::default();
        assert_eq!(row_offset(0, &config), Point::new(0.0, 0.0));
        assert_eq!(row_offset(1, &config), Point::new(30.0, 60.0));
        assert_eq!(row_offset(2, &config), Point::new(0.0, 120.0));
        assert_eq!(row_offset(7, &config), Point::new(30.0, 420.0));
    }

    #[test]
    fn layout_origin_centers_pattern() {
        let layout = PatternLayout::for_canvas(CanvasSize::new(800.0, 400.0), &GridConfig::default());
        assert_eq!(layout.origin, Point::new(-400.0, -200.0));
        assert_eq!(layout.circle_count(), 27 * 14);
    }

    #[test]
    fn extent_covers_twice_the_canvas() {
        let config = GridConfig::default();
        for (w, h) in [(1.0, 1.0), (59.0, 61.0), (800.0, 400.0), (1920.0, 1080.0)] {
            let ext = PatternLayout::for_canvas(CanvasSize::new(w, h), &config).extent(&config);
            assert!(ext.width >= 2.0 * w, "{w}: {}", ext.width);
            assert!(ext.height >= 2.0 * h, "{h}: {}", ext.height);
        }
    }

    #[test]
    fn build_row_spaces_circles() {
        let mut sg = SceneGraph::new();
        let row = build_row(&mut sg, 3, &GridConfig::default());
        let xs: Vec<f64> = sg
            .children(row)
            .into_iter()
            .map(|c| sg.position(c).unwrap().x)
            .collect();
        assert_eq!(xs, vec![0.0, 60.0, 120.0]);
        assert_eq!(sg.parent(row), None);
    }
}
