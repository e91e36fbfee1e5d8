use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Dashboard server settings; every field is optional in the JSON file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardCfg {
    pub address: String,
    pub port: u16,
    /// Dataset shown before anything is uploaded.
    pub default_dataset: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub title: String,
}

impl Default for DashboardCfg {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8050,
            default_dataset: None,
            max_upload_bytes: 8 * 1024 * 1024,
            title: "Point polygons".to_string(),
        }
    }
}

impl DashboardCfg {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Apply command-line overrides on top of the file (or default) values.
    pub fn with_overrides(
        mut self,
        address: Option<String>,
        port: Option<u16>,
        dataset: Option<PathBuf>,
    ) -> Self {
        if let Some(a) = address {
            self.address = a;
        }
        if let Some(p) = port {
            self.port = p;
        }
        if dataset.is_some() {
            self.default_dataset = dataset;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, r#"{"port": 9000, "default_dataset": "data/dataset1.json"}"#).unwrap();
        let cfg = DashboardCfg::from_file(&path).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.address, "127.0.0.1");
        assert_eq!(cfg.default_dataset, Some(PathBuf::from("data/dataset1.json")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, r#"{"prot": 9000}"#).unwrap();
        assert!(DashboardCfg::from_file(&path).is_err());
    }

    #[test]
    fn overrides_win() {
        let cfg = DashboardCfg::default().with_overrides(Some("0.0.0.0".into()), Some(1), None);
        assert_eq!(cfg.address, "0.0.0.0");
        assert_eq!(cfg.port, 1);
        assert_eq!(cfg.default_dataset, None);
    }
}
