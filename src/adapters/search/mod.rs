//! Video search adapters.

mod mock;
mod youtube;

pub use mock::MockVideoSearch;
pub use youtube::{YouTubeConfig, YouTubeSearch};
