#![warn(missing_docs)]
//! Core library for the seointel competitor-audit workflow.

pub mod gemini;
pub mod model;
pub mod render;
pub mod session;
pub mod workflow;

pub use gemini::{AnalysisProvider, AuditError, GeminiClient};
pub use model::{
    Competitor, ContentBrief, KeywordSuggestion, SchemaError, SeoAnalysisResults, SiteMetrics,
};
pub use session::Session;
pub use workflow::{
    AppPhase, CompetitorRejection, RequestTicket, WorkflowError, WorkflowState, MAX_COMPETITORS,
};

#[cfg(feature = "debug_logs")]
#[macro_export]
// This allows use of the `eprintln!` macro via `debug_log!` macro.
macro_rules! debug_log {
        ($($arg:tt)*) => {
            eprintln!($($arg)*);
        };
    }
#[cfg(not(feature = "debug_logs"))]
#[macro_export]
// This effectively disables the `eprintln!` macro, effectively removing it from the code during
// compilation.
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}
