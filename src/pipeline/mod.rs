//! Pipeline orchestration
//!
//! Runs the stages in order over owned data and gathers their tables into
//! one serializable report.

mod config;
mod runner;

pub use config::PipelineConfig;
pub use runner::{
    analyze, load_csv, run_logit, run_on_frame, run_pipeline, run_trees, AnalysisSummary, LogitReport,
    PipelineReport, TreeReport, TreeSummary,
};
