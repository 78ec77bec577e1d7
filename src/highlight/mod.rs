pub mod engine;
pub mod languages;
pub mod theme;

pub use engine::{HighlightEngine, HighlightSpan};
