//! Error types shared by the core and the web bridge.

use thiserror::Error;

/// Everything that can go wrong while wiring the background up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwashError {
    /// The drawing surface or the animation engine is not available.
    /// Raised before anything on the page is touched.
    #[error("missing runtime dependency: {name}")]
    MissingRuntimeDependency { name: &'static str },

    /// A host call failed while installing listeners (web bridge only).
    #[error("dom error: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, SwashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_names_the_dependency() {
        let err = SwashError::MissingRuntimeDependency { name: "stage" };
        assert_eq!(err.to_string(), "missing runtime dependency: stage");
    }
}
