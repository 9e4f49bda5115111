// src/coach/mod.rs — Non-AI coaching fallback

pub mod fallback;
pub mod templates;

pub use fallback::{Confidence, FallbackAnalysis, FallbackAnalyzer};
pub use templates::Category;
