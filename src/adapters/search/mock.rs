//! Mock video search for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::curation::SearchCandidate;
use crate::ports::{SearchError, VideoSearch};

#[derive(Debug, Clone)]
enum MockResult {
    Success(Vec<SearchCandidate>),
    Error(SearchError),
}

/// Mock video search with queued results and query capture.
#[derive(Debug, Clone, Default)]
pub struct MockVideoSearch {
    results: Arc<Mutex<VecDeque<MockResult>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockVideoSearch {
    /// Creates a mock with an empty result queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful result batch.
    pub fn with_results(self, candidates: Vec<SearchCandidate>) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(MockResult::Success(candidates));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: SearchError) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(MockResult::Error(error));
        self
    }

    /// Returns all queries issued so far.
    pub fn captured_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearch for MockVideoSearch {
    async fn search(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());

        let result = self.results.lock().unwrap().pop_front();
        match result {
            Some(MockResult::Success(mut candidates)) => {
                candidates.truncate(max_results as usize);
                Ok(candidates)
            }
            Some(MockResult::Error(err)) => Err(err),
            None => Ok(Vec::new()),
        }
    }
}
