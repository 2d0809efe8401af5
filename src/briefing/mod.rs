//! Briefing pipeline: store creation, file indexing, and generation calls.

pub mod extract;
pub mod prompts;
mod service;
pub mod types;

pub use extract::{ExtractError, extract_json};
pub use service::{BriefApi, BriefingService};
pub use types::{BriefError, BriefOutcome, SearchError, UploadedFile};
