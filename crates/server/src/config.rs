use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::{KnownSites, LaunchSite};
use tracing::warn;

pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_bind: String,
    pub dataset_path: String,
    pub payload_step: f64,
    pub known_sites: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8050".into(),
            dataset_path: "data/spacex_launch_dash.csv".into(),
            payload_step: 1000.0,
            known_sites: None,
        }
    }
}

impl Settings {
    /// Explicit site list, when configured; otherwise sites come from the dataset.
    pub fn known_sites(&self) -> Option<KnownSites> {
        self.known_sites
            .as_ref()
            .map(|sites| KnownSites::new(sites.iter().map(LaunchSite::new)))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    dataset_path: Option<String>,
    payload_step: Option<f64>,
    known_sites: Option<Vec<String>>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, overlaid by the settings file, overlaid by the environment.
pub(crate) fn load_settings_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.dataset_path {
                    settings.dataset_path = v;
                }
                match file_cfg.payload_step {
                    Some(v) if valid_step(v) => settings.payload_step = v,
                    Some(v) => {
                        warn!(value = v, path = %file.display(), "ignoring invalid payload_step")
                    }
                    None => {}
                }
                if let Some(v) = file_cfg.known_sites {
                    settings.known_sites = Some(v);
                }
            }
            Err(error) => {
                warn!(path = %file.display(), %error, "ignoring malformed settings file");
            }
        }
    }

    if let Some(v) = env("DASHBOARD_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("DASHBOARD_DATASET") {
        settings.dataset_path = v;
    }
    if let Some(v) = env("APP__DATASET_PATH") {
        settings.dataset_path = v;
    }

    if let Some(v) = env("APP__PAYLOAD_STEP") {
        match v.parse::<f64>() {
            Ok(parsed) if valid_step(parsed) => settings.payload_step = parsed,
            _ => warn!(value = %v, "ignoring invalid APP__PAYLOAD_STEP"),
        }
    }

    if let Some(v) = env("APP__KNOWN_SITES") {
        let sites: Vec<String> = v
            .split(',')
            .map(str::trim)
            .filter(|site| !site.is_empty())
            .map(str::to_string)
            .collect();
        if !sites.is_empty() {
            settings.known_sites = Some(sites);
        }
    }

    settings
}

fn valid_step(step: f64) -> bool {
    step.is_finite() && step > 0.0
}

pub fn resolve_dataset_path(raw_dataset_path: &str) -> anyhow::Result<PathBuf> {
    let raw_dataset_path = raw_dataset_path.trim();
    let path = if raw_dataset_path.is_empty() {
        PathBuf::from(Settings::default().dataset_path)
    } else {
        PathBuf::from(raw_dataset_path)
    };

    let metadata = fs::metadata(&path)
        .with_context(|| format!("dataset file '{}' is not readable", path.display()))?;
    anyhow::ensure!(
        metadata.is_file(),
        "dataset path '{}' is not a file",
        path.display()
    );

    Ok(path)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
