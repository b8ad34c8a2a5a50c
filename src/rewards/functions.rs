//! The five independent reward functions behind a uniform scoring trait.

use anyhow::Result;
use regex::Regex;

use super::batch::RewardBatch;
use super::extract::{extract_answer, score_tags};
use super::sample_log::SampleLogger;
use super::FALLBACK_REWARD;

/// A reward function scores a completion batch into one float per completion.
///
/// Malformed batches degrade to fallback vectors, never errors; only
/// genuine I/O failures surface as `Err`. Implementations hold no state
/// that affects scoring, so identical inputs yield identical outputs.
pub trait RewardFunction: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Score the batch, pre-multiplied by `weight`
    fn score(&self, batch: &RewardBatch<'_>, weight: f64) -> Result<Vec<f64>>;
}

/// Fallback vector for a missing or empty completions slice
fn fallback_single() -> Vec<f64> {
    vec![FALLBACK_REWARD]
}

/// Fallback vector covering every completion in the batch
fn fallback_filled(count: usize) -> Vec<f64> {
    vec![FALLBACK_REWARD; count]
}

/// Awards `weight` when the extracted answer string-equals the reference
/// answer, else the fallback. Wrong answers still earn a positive signal;
/// the asymmetry is intentional reward shaping, not a bug.
pub struct CorrectnessReward {
    /// Optional rate-limited sample log of scored batches
    sample_logger: Option<SampleLogger>,
}

impl CorrectnessReward {
    pub fn new(sample_logger: Option<SampleLogger>) -> Self {
        Self { sample_logger }
    }
}

impl RewardFunction for CorrectnessReward {
    fn name(&self) -> &'static str {
        "correctness"
    }

    fn score(&self, batch: &RewardBatch<'_>, weight: f64) -> Result<Vec<f64>> {
        let Some(completions) = batch.completions.filter(|c| !c.is_empty()) else {
            return Ok(fallback_single());
        };
        let Some(answers) = batch.answers.filter(|a| !a.is_empty()) else {
            return Ok(fallback_filled(completions.len()));
        };
        let (Some(responses), Some(question)) = (batch.completion_texts(), batch.question())
        else {
            return Ok(fallback_filled(completions.len()));
        };

        let extracted: Vec<String> = responses
            .iter()
            .copied()
            .map(|r| extract_answer(Some(r)))
            .collect();

        if let Some(logger) = &self.sample_logger {
            logger.maybe_log(question, &answers[0], responses[0], &extracted[0])?;
        }

        Ok(extracted
            .iter()
            .zip(answers)
            .map(|(response, answer)| {
                if response == answer {
                    weight
                } else {
                    FALLBACK_REWARD
                }
            })
            .collect())
    }
}

/// Awards `weight` when the extracted answer is a non-empty run of
/// decimal digits, else the fallback.
pub struct IntegerReward;

impl RewardFunction for IntegerReward {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn score(&self, batch: &RewardBatch<'_>, weight: f64) -> Result<Vec<f64>> {
        let Some(completions) = batch.completions.filter(|c| !c.is_empty()) else {
            return Ok(fallback_single());
        };
        let Some(responses) = batch.completion_texts() else {
            return Ok(fallback_filled(completions.len()));
        };

        Ok(responses
            .iter()
            .copied()
            .map(|r| {
                let extracted = extract_answer(Some(r));
                if !extracted.is_empty() && extracted.chars().all(|c| c.is_ascii_digit()) {
                    weight
                } else {
                    FALLBACK_REWARD
                }
            })
            .collect())
    }
}

/// Awards `weight` only when the whole completion matches the exact
/// `<think>` / `<answer>` line template with nothing after it.
pub struct StrictFormatReward {
    pattern: Regex,
}

impl StrictFormatReward {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^<think>\n.*?\n</think>\n<answer>\n.*?\n</answer>\n$").unwrap(),
        }
    }
}

impl Default for StrictFormatReward {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardFunction for StrictFormatReward {
    fn name(&self) -> &'static str {
        "strict_format"
    }

    fn score(&self, batch: &RewardBatch<'_>, weight: f64) -> Result<Vec<f64>> {
        score_by_pattern(batch, &self.pattern, weight)
    }
}

/// Awards `weight` when the completion opens with a `<think>` block
/// followed by an `<answer>` block; tag bodies may span newlines and
/// trailing content is allowed.
pub struct SoftFormatReward {
    pattern: Regex,
}

impl SoftFormatReward {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"(?s)^<think>.*?</think>\s*<answer>.*?</answer>").unwrap(),
        }
    }
}

impl Default for SoftFormatReward {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardFunction for SoftFormatReward {
    fn name(&self) -> &'static str {
        "soft_format"
    }

    fn score(&self, batch: &RewardBatch<'_>, weight: f64) -> Result<Vec<f64>> {
        score_by_pattern(batch, &self.pattern, weight)
    }
}

fn score_by_pattern(batch: &RewardBatch<'_>, pattern: &Regex, weight: f64) -> Result<Vec<f64>> {
    let Some(completions) = batch.completions.filter(|c| !c.is_empty()) else {
        return Ok(fallback_single());
    };
    let Some(responses) = batch.completion_texts() else {
        return Ok(fallback_filled(completions.len()));
    };

    Ok(responses
        .iter()
        .map(|r| {
            if pattern.is_match(r) {
                weight
            } else {
                FALLBACK_REWARD
            }
        })
        .collect())
}

/// Multiplies the tag-structure score by `weight`; any non-positive
/// product is replaced by the fallback.
pub struct TagCountReward;

impl RewardFunction for TagCountReward {
    fn name(&self) -> &'static str {
        "tag_count"
    }

    fn score(&self, batch: &RewardBatch<'_>, weight: f64) -> Result<Vec<f64>> {
        let Some(completions) = batch.completions.filter(|c| !c.is_empty()) else {
            return Ok(fallback_single());
        };
        let Some(responses) = batch.completion_texts() else {
            return Ok(fallback_filled(completions.len()));
        };

        Ok(responses
            .iter()
            .copied()
            .map(|r| {
                let score = score_tags(Some(r)) * weight;
                if score > 0.0 {
                    score
                } else {
                    FALLBACK_REWARD
                }
            })
            .collect())
    }
}
