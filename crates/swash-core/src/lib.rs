pub mod animator;
pub mod error;
pub mod layout;
pub mod model;
pub mod page;
pub mod stage;
pub mod ticker;
pub mod tween;

pub use animator::{DrawingSurface, GridAnimator};
pub use error::{Result, SwashError};
pub use layout::{CanvasSize, GridConfig, PatternLayout, build_pattern};
pub use model::*;
pub use page::PageInitializer;
pub use stage::{AnimationEngine, Renderer, Stage};
pub use ticker::Ticker;
pub use tween::{Easing, Tween, TweenOptions, Tweens};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
