//! Ports - async trait interfaces at the system's seams.
//!
//! Adapters implement these against real collaborators (Anthropic, the
//! video platform, storage); mocks implement them for tests.

mod ai_provider;
mod path_repository;
mod session_store;
mod video_search;

pub use ai_provider::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use path_repository::{PathRepository, RepositoryError, StoredPath};
pub use session_store::{SessionStore, SessionStoreError};
pub use video_search::{SearchError, VideoSearch};
