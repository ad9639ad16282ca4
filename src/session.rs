//! Long-lived controller pairing workflow transitions with provider calls.

use crate::gemini::{AnalysisProvider, AuditError};
use crate::workflow::{CompetitorRejection, WorkflowError, WorkflowState};

/// Banner shown when competitor discovery fails.
pub const DISCOVERY_FAILED: &str = "Failed to discover competitors. Please check the URL.";
/// Banner shown when the deep audit fails at the transport level.
pub const ANALYSIS_FAILED: &str = "An error occurred during analysis.";
/// Banner shown when the deep audit response cannot be processed.
pub const ANALYSIS_UNREADABLE: &str = "Failed to process SEO data.";
/// Banner shown when a custom competitor URL does not parse.
pub const INVALID_COMPETITOR_URL: &str = "Invalid URL format for custom competitor.";

/// Owns the [`WorkflowState`] and a provider, exposing the user-facing
/// operations of the four-phase workflow. Each model-backed operation brackets
/// the blocking provider call between a `begin_*` and the matching `finish_*`
/// transition, so the staleness guard in the state machine applies even though
/// the caller blocks.
pub struct Session<P> {
    state: WorkflowState,
    provider: P,
}

impl<P: AnalysisProvider> Session<P> {
    /// Creates a fresh session around the given provider.
    pub fn new(provider: P) -> Self {
        Self {
            state: WorkflowState::new(),
            provider,
        }
    }

    /// Read access to the workflow state for rendering.
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Submits the brand URL and runs competitor discovery.
    pub fn submit_brand(&mut self, brand_url: &str) -> Result<(), WorkflowError> {
        let ticket = self.state.begin_discovery(brand_url)?;
        let outcome = self
            .provider
            .discover_competitors(self.state.brand_url())
            .map_err(|_| DISCOVERY_FAILED.to_string());
        self.state.finish_discovery(ticket, outcome);
        Ok(())
    }

    /// Adds a manually entered competitor, surfacing URL errors as the banner.
    /// A full list is a silent no-op.
    pub fn add_competitor(&mut self, url: &str) {
        match self.state.add_competitor(url) {
            Ok(()) | Err(CompetitorRejection::ListFull | CompetitorRejection::Duplicate(_)) => {}
            Err(CompetitorRejection::InvalidUrl(_)) => {
                self.state.set_error(INVALID_COMPETITOR_URL);
            }
        }
    }

    /// Removes the competitor with the given URL; absent URLs are a no-op.
    pub fn remove_competitor(&mut self, url: &str) {
        self.state.remove_competitor(url);
    }

    /// Runs the deep audit against the confirmed competitor list.
    pub fn start_analysis(&mut self) -> Result<(), WorkflowError> {
        let ticket = self.state.begin_audit()?;
        let outcome = self
            .provider
            .perform_deep_audit(self.state.brand_url(), self.state.competitors())
            .map_err(|err| match err {
                AuditError::Transport(_) => ANALYSIS_FAILED.to_string(),
                AuditError::Parse(_) | AuditError::Schema(_) => ANALYSIS_UNREADABLE.to_string(),
            });
        self.state.finish_audit(ticket, outcome);
        Ok(())
    }

    /// Full reset back to the input phase.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Clears the error banner.
    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }
}
