use shared::{
    domain::{ControlState, PayloadRange},
    protocol::{ControlChange, DashboardView},
};
use tracing::{debug, warn};

use crate::{DashboardContext, EngineError};

/// One UI session: the live control state and the last view rendered from it.
///
/// Every accepted change recomputes both charts before anything is committed,
/// so a rejected change leaves the previous state and view in place.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    ctx: DashboardContext,
    control: ControlState,
    view: DashboardView,
}

impl DashboardSession {
    pub fn new(ctx: DashboardContext) -> Result<Self, EngineError> {
        let control = ctx.dataset.initial_control_state();
        let view = ctx.evaluate(&control)?;
        Ok(Self { ctx, control, view })
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn apply(&mut self, change: ControlChange) -> Result<&DashboardView, EngineError> {
        let next = match self.next_state(&change) {
            Ok(next) => next,
            Err(error) => {
                warn!(?change, %error, "control change rejected; keeping previous view");
                return Err(error);
            }
        };
        let view = match self.ctx.evaluate(&next) {
            Ok(view) => view,
            Err(error) => {
                warn!(?change, %error, "recomputation failed; keeping previous view");
                return Err(error);
            }
        };

        debug!(
            site = %next.selected_site,
            low = next.payload_range.low(),
            high = next.payload_range.high(),
            points = view.scatter.points.len(),
            "dashboard recomputed"
        );
        self.control = next;
        self.view = view;
        Ok(&self.view)
    }

    fn next_state(&self, change: &ControlChange) -> Result<ControlState, EngineError> {
        let mut next = self.control.clone();
        match change {
            ControlChange::SelectSite { site } => {
                next.selected_site = self.ctx.dataset.sites().resolve(site)?;
            }
            ControlChange::SetPayloadRange { low, high } => {
                next.payload_range = PayloadRange::new(*low, *high)?;
            }
        }
        Ok(next)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
