//! Data models for the run report printed at the end of a run.

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Counts gathered by the pipeline stages.
pub struct Summary {
    pub rules: usize,
    pub used_files: usize,
    pub all_files: usize,
    pub unused_files: usize,
    pub browse_paths: usize,
}

#[derive(Serialize, Debug, Clone)]
/// Paths of the artifacts a run produced.
pub struct Artifacts {
    pub compile_db: String,
    pub settings: String,
    pub properties: String,
}

#[derive(Serialize, Debug, Clone)]
/// Result of one pipeline run.
pub struct Report {
    pub src_dir: String,
    pub build_dir: String,
    pub summary: Summary,
    pub artifacts: Artifacts,
}
