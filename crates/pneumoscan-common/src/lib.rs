//! pneumoscan-common: Shared types, errors, and view-state machines used across all
//! Pneumoscan crates.

pub mod error;
pub mod models;
pub mod flow;
pub mod report;
pub mod profile;

// Re-export commonly used types
pub use error::{PneumoscanError, Result};
pub use flow::{ChatFlow, FlowState, UploadFlow};
pub use models::{AnalysisResult, ChatAnswer, ChatRequest, SelectedFile, StructuredReport};
