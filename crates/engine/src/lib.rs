//! Filter-and-aggregate engine behind the launch dashboard.
//!
//! Two projections are derived from the shared [`Dataset`]:
//! - the proportional breakdown, scoped by site only (payload range is NOT applied);
//! - the scatter projection, scoped by site AND payload range.
//!
//! [`DashboardSession`] binds the two to a live [`ControlState`].

use std::sync::Arc;

use dataset::Dataset;
use shared::{
    domain::{ControlState, PayloadRange, SiteSelection, ALL_SITES},
    error::{ApiError, DomainError, ErrorCode},
    protocol::{ControlOptions, DashboardView, PieFigure, ScatterFigure, SiteOption},
};
use thiserror::Error;

mod aggregate;
mod filter;
mod session;

pub use aggregate::{proportional_breakdown, scatter_projection};
pub use filter::{filter, filter_by_site};
pub use session::DashboardSession;

pub const ALL_SITES_LABEL: &str = "All Sites";
pub const PIE_TITLE_ALL: &str = "Total success launch by site";
pub const PAYLOAD_AXIS: &str = "Payload Mass (kg)";
pub const CLASS_AXIS: &str = "class";
pub const BOOSTER_CATEGORY_AXIS: &str = "Booster Version Category";
const SITE_COLUMN: &str = "Launch Site";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown launch site '{0}'")]
    InvalidSelection(String),
    #[error("invalid payload range [{low}, {high}]: low must not exceed high")]
    InvalidRange { low: f64, high: f64 },
    #[error("dataset invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<DomainError> for EngineError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidSelection(site) => Self::InvalidSelection(site),
            DomainError::InvalidRange { low, high } => Self::InvalidRange { low, high },
            other @ DomainError::InvalidOutcomeClass(_) => {
                Self::InvariantViolation(other.to_string())
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(value: EngineError) -> Self {
        let code = match &value {
            EngineError::InvalidSelection(_) => ErrorCode::InvalidSelection,
            EngineError::InvalidRange { .. } => ErrorCode::InvalidRange,
            EngineError::InvariantViolation(_) => ErrorCode::Internal,
        };
        ApiError::new(code, value.to_string())
    }
}

/// Explicit context handed to every recomputation: the read-only dataset
/// plus the UI settings that shape the controls.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub dataset: Arc<Dataset>,
    pub payload_step: f64,
}

impl DashboardContext {
    pub fn new(dataset: Arc<Dataset>, payload_step: f64) -> Self {
        Self {
            dataset,
            payload_step,
        }
    }

    pub fn control_options(&self) -> ControlOptions {
        let bounds = self.dataset.payload_bounds();
        let mut sites = vec![SiteOption {
            label: ALL_SITES_LABEL.to_string(),
            value: ALL_SITES.to_string(),
        }];
        sites.extend(self.dataset.sites().iter().map(|site| SiteOption {
            label: site.to_string(),
            value: site.to_string(),
        }));

        ControlOptions {
            sites,
            payload_min: bounds.low(),
            payload_max: bounds.high(),
            payload_step: self.payload_step,
            initial: self.dataset.initial_control_state(),
        }
    }

    /// Builds a control state from optional raw inputs, falling back to the
    /// session defaults for anything omitted.
    pub fn control_state(
        &self,
        site: Option<&str>,
        low: Option<f64>,
        high: Option<f64>,
    ) -> Result<ControlState, EngineError> {
        let selected_site = match site {
            Some(raw) => self.dataset.sites().resolve(raw)?,
            None => SiteSelection::All,
        };
        let bounds = self.dataset.payload_bounds();
        let payload_range = PayloadRange::new(
            low.unwrap_or_else(|| bounds.low()),
            high.unwrap_or_else(|| bounds.high()),
        )?;
        Ok(ControlState::new(selected_site, payload_range))
    }

    pub fn pie_figure(&self, selection: &SiteSelection) -> Result<PieFigure, EngineError> {
        let records = filter_by_site(&self.dataset, selection)?;
        let breakdown = proportional_breakdown(self.dataset.sites(), &records, selection)?;
        let (title, names) = match selection {
            SiteSelection::All => (PIE_TITLE_ALL.to_string(), SITE_COLUMN),
            SiteSelection::Site(site) => {
                (format!("Total success launch for site {site}"), CLASS_AXIS)
            }
        };
        Ok(PieFigure {
            title,
            names: names.to_string(),
            breakdown,
        })
    }

    pub fn scatter_figure(&self, control: &ControlState) -> Result<ScatterFigure, EngineError> {
        let records = filter(&self.dataset, control)?;
        let points = scatter_projection(self.dataset.sites(), &records)?;
        Ok(ScatterFigure {
            x: PAYLOAD_AXIS.to_string(),
            y: CLASS_AXIS.to_string(),
            color: BOOSTER_CATEGORY_AXIS.to_string(),
            points,
        })
    }

    /// Recomputes both charts for `control`.
    pub fn evaluate(&self, control: &ControlState) -> Result<DashboardView, EngineError> {
        Ok(DashboardView {
            control: control.clone(),
            pie: self.pie_figure(&control.selected_site)?,
            scatter: self.scatter_figure(control)?,
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
