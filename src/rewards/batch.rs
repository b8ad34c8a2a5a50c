use serde::{Deserialize, Serialize};

/// A single conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Ordered turns of one conversation
pub type Conversation = Vec<Message>;

/// Borrowed view over the inputs of one scoring call.
///
/// `None` models a missing input; an empty slice models an empty one.
/// Both degrade to fallback rewards downstream instead of erroring.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardBatch<'a> {
    /// One conversation per question; the last turn holds the question text
    pub prompts: Option<&'a [Conversation]>,

    /// One conversation per sampled generation; the first turn holds the response text
    pub completions: Option<&'a [Conversation]>,

    /// Ground-truth answers, index-aligned with the completions
    pub answers: Option<&'a [String]>,
}

impl<'a> RewardBatch<'a> {
    pub fn new(
        prompts: Option<&'a [Conversation]>,
        completions: Option<&'a [Conversation]>,
        answers: Option<&'a [String]>,
    ) -> Self {
        Self {
            prompts,
            completions,
            answers,
        }
    }

    /// Number of completions in the batch, zero when missing
    pub fn completion_count(&self) -> usize {
        self.completions.map(|c| c.len()).unwrap_or(0)
    }

    /// First-turn content of every completion.
    ///
    /// Returns `None` when the batch is missing or any completion lacks
    /// its payload turn; callers degrade the whole batch in that case.
    pub fn completion_texts(&self) -> Option<Vec<&'a str>> {
        self.completions?
            .iter()
            .map(|c| c.first().map(|m| m.content.as_str()))
            .collect()
    }

    /// The question text: final turn of the first prompt conversation
    pub fn question(&self) -> Option<&'a str> {
        self.prompts?.first()?.last().map(|m| m.content.as_str())
    }
}

/// Owned batch as read from a JSON file by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFile {
    pub prompts: Vec<Conversation>,
    pub completions: Vec<Conversation>,
    #[serde(default)]
    pub answers: Vec<String>,
}

impl BatchFile {
    /// Borrow this file as a scoring batch
    pub fn as_batch(&self) -> RewardBatch<'_> {
        RewardBatch::new(
            Some(&self.prompts),
            Some(&self.completions),
            Some(&self.answers),
        )
    }
}
