//! Four-phase workflow state machine for the audit session.
//!
//! The state lives in one `WorkflowState` owned by a long-lived session, and
//! every transition is an explicit method so the whole machine is testable
//! without a UI harness. The two model-backed calls are the only suspension
//! points; each is bracketed by a `begin_*` transition that issues a
//! [`RequestTicket`] and a `finish_*` transition that applies the outcome only
//! while its ticket is still the latest outstanding one. A reset bumps the
//! ticket counter, so a call resolving after a reset is discarded instead of
//! resurrecting stale state.

use url::Url;

use crate::model::{Competitor, SeoAnalysisResults};

/// Maximum number of competitors held in the working set.
pub const MAX_COMPETITORS: usize = 5;

/// The four phases of the audit workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Waiting for a brand URL.
    Input,
    /// Reviewing and editing the discovered competitor list.
    CompetitorSelection,
    /// Deep audit in flight.
    AnalysisLoading,
    /// Results dashboard on display.
    Dashboard,
}

impl AppPhase {
    /// Human-readable phase label shown in the header.
    pub fn label(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::CompetitorSelection => "COMPETITOR SELECTION",
            Self::AnalysisLoading => "ANALYSIS LOADING",
            Self::Dashboard => "DASHBOARD",
        }
    }
}

/// Identifier tying an in-flight model call to the state that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Transition attempted from a phase that does not offer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The brand URL was empty or whitespace.
    EmptyBrandUrl,
    /// The operation is not available in the current phase.
    WrongPhase {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Phase the machine was in.
        phase: AppPhase,
    },
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBrandUrl => write!(f, "brand URL must not be empty"),
            Self::WrongPhase { operation, phase } => {
                write!(f, "{} is not available in phase {}", operation, phase.label())
            }
        }
    }
}

impl std::error::Error for WorkflowError {}

/// Reasons a manual competitor entry is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompetitorRejection {
    /// The working set already holds [`MAX_COMPETITORS`] entries; a no-op.
    ListFull,
    /// The URL could not be parsed; the caller should surface an error.
    InvalidUrl(String),
    /// The URL is already present; entries are unique by URL.
    Duplicate(String),
}

impl std::fmt::Display for CompetitorRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListFull => write!(f, "competitor list already holds {MAX_COMPETITORS} entries"),
            Self::InvalidUrl(url) => write!(f, "invalid competitor URL: {url}"),
            Self::Duplicate(url) => write!(f, "competitor already listed: {url}"),
        }
    }
}

impl std::error::Error for CompetitorRejection {}

/// Mutable state for one audit workflow, owned by the session.
#[derive(Debug)]
pub struct WorkflowState {
    phase: AppPhase,
    brand_url: String,
    competitors: Vec<Competitor>,
    results: Option<SeoAnalysisResults>,
    error: Option<String>,
    loading: bool,
    next_ticket: u64,
    outstanding: Option<RequestTicket>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    /// Fresh state at the start of the workflow.
    pub fn new() -> Self {
        Self {
            phase: AppPhase::Input,
            brand_url: String::new(),
            competitors: Vec::new(),
            results: None,
            error: None,
            loading: false,
            next_ticket: 0,
            outstanding: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    /// Brand URL under audit; empty until submitted.
    pub fn brand_url(&self) -> &str {
        &self.brand_url
    }

    /// Working set of competitors.
    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    /// Latest audit snapshot, if one has been received.
    pub fn results(&self) -> Option<&SeoAnalysisResults> {
        self.results.as_ref()
    }

    /// Dismissable error banner text, if set.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a model call is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Remaining manual-entry slots before the cap.
    pub fn open_slots(&self) -> usize {
        MAX_COMPETITORS.saturating_sub(self.competitors.len())
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        let ticket = RequestTicket(self.next_ticket);
        self.next_ticket += 1;
        self.outstanding = Some(ticket);
        ticket
    }

    fn settle(&mut self, ticket: RequestTicket) -> bool {
        if self.outstanding != Some(ticket) {
            return false;
        }
        self.outstanding = None;
        self.loading = false;
        true
    }

    /// Accepts the brand URL and issues a ticket for the discovery call.
    pub fn begin_discovery(&mut self, brand_url: &str) -> Result<RequestTicket, WorkflowError> {
        if self.phase != AppPhase::Input {
            return Err(WorkflowError::WrongPhase {
                operation: "discovery",
                phase: self.phase,
            });
        }
        let trimmed = brand_url.trim();
        if trimmed.is_empty() {
            return Err(WorkflowError::EmptyBrandUrl);
        }
        self.brand_url = trimmed.to_string();
        self.error = None;
        self.loading = true;
        Ok(self.issue_ticket())
    }

    /// Applies a discovery outcome. Returns false when the ticket is stale and
    /// the outcome was discarded.
    pub fn finish_discovery(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<Competitor>, String>,
    ) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        match outcome {
            Ok(mut discovered) => {
                // The model is untrusted; enforce the cap and uniqueness here.
                discovered.truncate(MAX_COMPETITORS);
                self.competitors.clear();
                for competitor in discovered {
                    if !self.competitors.iter().any(|c| c.url == competitor.url) {
                        self.competitors.push(competitor);
                    }
                }
                self.phase = AppPhase::CompetitorSelection;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        true
    }

    /// Adds a manually entered competitor, deriving its name from the URL host.
    pub fn add_competitor(&mut self, raw_url: &str) -> Result<(), CompetitorRejection> {
        if self.competitors.len() >= MAX_COMPETITORS {
            return Err(CompetitorRejection::ListFull);
        }
        let trimmed = raw_url.trim();
        let name = Url::parse(trimmed)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .ok_or_else(|| CompetitorRejection::InvalidUrl(trimmed.to_string()))?;
        if self.competitors.iter().any(|c| c.url == trimmed) {
            return Err(CompetitorRejection::Duplicate(trimmed.to_string()));
        }
        self.competitors.push(Competitor {
            url: trimmed.to_string(),
            name,
            is_custom: true,
        });
        Ok(())
    }

    /// Removes the competitor with the given URL. Absent URLs are a no-op.
    pub fn remove_competitor(&mut self, url: &str) {
        self.competitors.retain(|c| c.url != url);
    }

    /// Moves to the loading phase and issues a ticket for the deep audit.
    pub fn begin_audit(&mut self) -> Result<RequestTicket, WorkflowError> {
        if self.phase != AppPhase::CompetitorSelection {
            return Err(WorkflowError::WrongPhase {
                operation: "deep audit",
                phase: self.phase,
            });
        }
        self.phase = AppPhase::AnalysisLoading;
        self.error = None;
        self.loading = true;
        Ok(self.issue_ticket())
    }

    /// Applies an audit outcome: the dashboard on success, a rollback to
    /// competitor selection on failure. Returns false for stale tickets.
    pub fn finish_audit(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<SeoAnalysisResults, String>,
    ) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        match outcome {
            Ok(results) => {
                self.results = Some(results);
                self.phase = AppPhase::Dashboard;
            }
            Err(message) => {
                self.error = Some(message);
                self.phase = AppPhase::CompetitorSelection;
            }
        }
        true
    }

    /// Full reset: every field back to its initial value. Outstanding tickets
    /// are invalidated so late completions cannot overwrite the fresh state.
    pub fn reset(&mut self) {
        let next_ticket = self.next_ticket;
        *self = Self::new();
        self.next_ticket = next_ticket;
    }

    /// Sets the dismissable error banner.
    pub fn set_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    /// Clears the error banner.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
