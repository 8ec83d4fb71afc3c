use crate::error::{Result, XmlpackError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Knobs for one pipeline run. `Default` reproduces the stock benchmark shape
/// (50 archives of 100 documents each).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Random bytes per record id; the hex id is twice as long.
    pub token_bytes: usize,
    /// Random bytes behind each object name (base64url encoded).
    pub name_length: usize,
    pub objects_max: u32,
    pub level_max: u32,
    pub records_per_archive: usize,
    pub archive_count: usize,
    /// Worker threads; `None` sizes the pool to the available cores.
    pub workers: Option<usize>,
    /// Directory receiving the archives and the two CSV artifacts.
    pub out_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            token_bytes: 64,
            name_length: 32,
            objects_max: 10,
            level_max: 100,
            records_per_archive: 100,
            archive_count: 50,
            workers: None,
            out_dir: PathBuf::from("."),
        }
    }
}

impl PipelineConfig {
    /// Loads a JSON config file; missing fields fall back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path)?;
        serde_json::from_slice(&raw)
            .map_err(|e| XmlpackError::Config(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> Result<()> {
        let checks: [(&str, bool); 6] = [
            ("token_bytes", self.token_bytes == 0),
            ("name_length", self.name_length == 0),
            ("objects_max", self.objects_max == 0),
            ("level_max", self.level_max == 0),
            ("records_per_archive", self.records_per_archive == 0),
            ("archive_count", self.archive_count == 0),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, zero)| *zero) {
            return Err(XmlpackError::Config(format!("{field} must be at least 1")));
        }
        if self.workers == Some(0) {
            return Err(XmlpackError::Config("workers must be at least 1".into()));
        }
        Ok(())
    }

    pub fn archive_path(&self, index: usize) -> PathBuf {
        self.out_dir.join(archive_name(index))
    }
}

pub fn archive_name(index: usize) -> String {
    format!("{index}.zip")
}

pub fn member_name(index: usize) -> String {
    format!("{index}.xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_fields_are_rejected() {
        let cfg = PipelineConfig {
            objects_max: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("objects_max"));

        let cfg = PipelineConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(XmlpackError::Config(_))));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"archive_count": 2, "workers": 3}"#).unwrap();
        let cfg = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.archive_count, 2);
        assert_eq!(cfg.workers, Some(3));
        assert_eq!(cfg.records_per_archive, 100);
    }

    #[test]
    fn names_follow_index() {
        assert_eq!(archive_name(7), "7.zip");
        assert_eq!(member_name(0), "0.xml");
        let cfg = PipelineConfig {
            out_dir: PathBuf::from("/tmp/x"),
            ..Default::default()
        };
        assert_eq!(cfg.archive_path(3), PathBuf::from("/tmp/x/3.zip"));
    }
}
