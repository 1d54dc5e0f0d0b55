// src/analysis/mod.rs
pub mod findings;
pub mod result;

// Re-export commonly used types
pub use findings::parse_findings;
pub use result::{AnalysisResult, Findings};
