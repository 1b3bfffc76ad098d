use serde::{Deserialize, Serialize};

const DEFAULT_MINIMUM_SCORE: u32 = 20;

/// Human shortlisting threshold shown next to a score.
///
/// Display only: neither the scorer nor the pipeline consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistPolicy {
    minimum_score: u32,
}

impl ShortlistPolicy {
    pub const fn new(minimum_score: u32) -> Self {
        Self { minimum_score }
    }

    pub const fn minimum_score(&self) -> u32 {
        self.minimum_score
    }

    pub const fn is_eligible(&self, score: u32) -> bool {
        score >= self.minimum_score
    }

    pub fn hint(&self) -> String {
        format!("minimum {} required for shortlisting", self.minimum_score)
    }
}

impl Default for ShortlistPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMUM_SCORE)
    }
}
