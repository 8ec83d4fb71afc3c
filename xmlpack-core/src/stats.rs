use serde::Serialize;
use std::path::PathBuf;

/// Summary of a pipeline run, filled in phase by phase.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    pub workers: usize,
    pub archives: usize,
    pub records: usize,
    pub level_rows: usize,
    pub object_rows: usize,
    pub build_secs: f64,
    pub read_secs: f64,
    pub aggregate_secs: f64,
    pub levels_path: Option<PathBuf>,
    pub objects_path: Option<PathBuf>,
}
