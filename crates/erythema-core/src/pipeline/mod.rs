//! Pipeline orchestration: technique phases, configuration, and results.

pub mod config;
pub mod orchestrator;
pub mod technique;

pub use config::PipelineConfig;
pub use orchestrator::{ExecutionPlan, PipelineResult, plan, run_pipeline};
pub use technique::{Phase, Technique, TechniqueSelection};
