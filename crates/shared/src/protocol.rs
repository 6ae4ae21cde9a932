use serde::{Deserialize, Serialize};

use crate::{
    domain::{ControlState, OutcomeClass},
    error::ApiError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub key: String,
    pub count: usize,
}

/// Ordered category → count mapping feeding the proportional chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub slices: Vec<CategoryCount>,
}

impl CategoryBreakdown {
    pub fn from_counts<K: Into<String>>(counts: impl IntoIterator<Item = (K, usize)>) -> Self {
        Self {
            slices: counts
                .into_iter()
                .map(|(key, count)| CategoryCount {
                    key: key.into(),
                    count,
                })
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.slices
            .iter()
            .find(|slice| slice.key == key)
            .map(|slice| slice.count)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|slice| slice.key.as_str())
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|slice| slice.count).sum()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome_class: OutcomeClass,
    pub booster_version_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieFigure {
    pub title: String,
    /// Column the slices are named after (`Launch Site` or `class`).
    pub names: String,
    pub breakdown: CategoryBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterFigure {
    pub x: String,
    pub y: String,
    pub color: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub control: ControlState,
    pub pie: PieFigure,
    pub scatter: ScatterFigure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

/// Everything the UI shell needs to draw its two controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlOptions {
    pub sites: Vec<SiteOption>,
    pub payload_min: f64,
    pub payload_max: f64,
    pub payload_step: f64,
    pub initial: ControlState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ControlChange {
    SelectSite { site: String },
    SetPayloadRange { low: f64, high: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    ViewUpdated { view: DashboardView },
    Rejected(ApiError),
}
