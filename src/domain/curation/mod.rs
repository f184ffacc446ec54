//! Curation module - turning raw search results into staged curricula.
//!
//! The engine sends candidates plus resolved intent to the reasoning
//! service, strictly decodes the structured block in its reply, and merges
//! the claims back against the original candidate batch so that only real
//! videos survive.

mod candidate;
pub mod duration;
mod engine;
mod extractor;
mod path;
mod payload;

pub use candidate::SearchCandidate;
pub use engine::{CurationEngine, CurationRequest};
pub use extractor::{CurationParseError, ResponseSanitizer, extract_json_object};
pub use path::{LearningPath, LearningStage, VideoAnalysis};
pub use payload::{CuratedPathPayload, CuratedStagePayload, CuratedVideoPayload};
