use anyhow::Result;
use log::debug;

use crate::core::config::{RewardConfig, RewardWeights};

use super::batch::RewardBatch;
use super::functions::{
    CorrectnessReward, IntegerReward, RewardFunction, SoftFormatReward, StrictFormatReward,
    TagCountReward,
};
use super::sample_log::SampleLogger;
use super::FALLBACK_REWARD;

/// Weighted stack of reward functions summed elementwise per completion.
///
/// The stack is a list of (function, weight) pairs, so adding or
/// removing a signal is a data change rather than a code change.
pub struct RewardStack {
    functions: Vec<(Box<dyn RewardFunction>, f64)>,
}

impl RewardStack {
    /// Standard five-function stack with the given weights
    pub fn new(weights: &RewardWeights, sample_logger: Option<SampleLogger>) -> Self {
        let functions: Vec<(Box<dyn RewardFunction>, f64)> = vec![
            (
                Box::new(CorrectnessReward::new(sample_logger)),
                weights.correctness,
            ),
            (Box::new(IntegerReward), weights.integer),
            (Box::new(StrictFormatReward::new()), weights.strict_format),
            (Box::new(SoftFormatReward::new()), weights.soft_format),
            (Box::new(TagCountReward), weights.tag_count),
        ];
        Self { functions }
    }

    /// Build a stack from configuration, wiring up the sample logger
    /// when enabled
    pub fn from_config(config: &RewardConfig) -> Result<Self> {
        config.validate()?;
        let sample_logger = if config.sample_log.enabled {
            Some(SampleLogger::new(config.sample_log.clone()))
        } else {
            None
        };
        Ok(Self::new(&config.weights, sample_logger))
    }

    /// The (function, weight) pairs in scoring order
    pub fn functions(&self) -> &[(Box<dyn RewardFunction>, f64)] {
        &self.functions
    }

    /// Sum every weighted member elementwise into one total per completion.
    ///
    /// Missing or empty prompts or completions degrade to a single
    /// fallback element. Every member is computed even when one of them
    /// degrades internally; the sum still proceeds arithmetically.
    pub fn aggregate(&self, batch: &RewardBatch<'_>) -> Result<Vec<f64>> {
        if batch.prompts.filter(|p| !p.is_empty()).is_none()
            || batch.completions.filter(|c| !c.is_empty()).is_none()
        {
            return Ok(vec![FALLBACK_REWARD]);
        }

        let mut vectors = Vec::with_capacity(self.functions.len());
        for (function, weight) in &self.functions {
            let scores = function.score(batch, *weight)?;
            debug!("{} scores: {:?}", function.name(), scores);
            vectors.push(scores);
        }

        // Elementwise sum, truncated to the shortest member.
        let len = vectors.iter().map(Vec::len).min().unwrap_or(0);
        Ok((0..len)
            .map(|idx| vectors.iter().map(|v| v[idx]).sum())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::batch::{Conversation, Message};
    use crate::rewards::extract::score_tags;

    const WELL_FORMED: &str = "<think>\nreasoning\n</think>\n<answer>\n42\n</answer>\n";

    fn completion(text: &str) -> Conversation {
        vec![Message::new("assistant", text)]
    }

    fn prompt(question: &str) -> Conversation {
        vec![Message::new("user", question)]
    }

    #[test]
    fn test_aggregate_sums_all_five_functions() {
        let prompts = vec![prompt("What is 6 * 7?")];
        let completions = vec![completion(WELL_FORMED)];
        let answers = vec!["42".to_string()];
        let batch = RewardBatch::new(Some(&prompts), Some(&completions), Some(&answers));

        let stack = RewardStack::new(&RewardWeights::default(), None);
        let totals = stack.aggregate(&batch).unwrap();

        // correctness 8.0, integer 2.0, strict 2.0, soft 2.0,
        // tag-count score_tags * 4.0
        let expected = 8.0 + 2.0 + 2.0 + 2.0 + score_tags(Some(WELL_FORMED)) * 4.0;
        assert_eq!(totals.len(), 1);
        assert!((totals[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_equals_manual_elementwise_sum() {
        let prompts = vec![prompt("q")];
        let completions = vec![
            completion(WELL_FORMED),
            completion("The answer is 43"),
            completion("<answer>\n43\n</answer>"),
        ];
        let answers = vec!["42".to_string(), "42".to_string(), "42".to_string()];
        let batch = RewardBatch::new(Some(&prompts), Some(&completions), Some(&answers));

        let stack = RewardStack::new(&RewardWeights::default(), None);
        let totals = stack.aggregate(&batch).unwrap();

        let mut expected = vec![0.0; completions.len()];
        for (function, weight) in stack.functions() {
            for (slot, score) in expected
                .iter_mut()
                .zip(function.score(&batch, *weight).unwrap())
            {
                *slot += score;
            }
        }
        assert_eq!(totals, expected);
    }

    #[test]
    fn test_aggregate_missing_prompts_degrades() {
        let completions = vec![completion(WELL_FORMED)];
        let batch = RewardBatch::new(None, Some(&completions), None);

        let stack = RewardStack::new(&RewardWeights::default(), None);
        assert_eq!(stack.aggregate(&batch).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_aggregate_empty_completions_degrades() {
        let prompts = vec![prompt("q")];
        let completions: Vec<Conversation> = vec![];
        let batch = RewardBatch::new(Some(&prompts), Some(&completions), None);

        let stack = RewardStack::new(&RewardWeights::default(), None);
        assert_eq!(stack.aggregate(&batch).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_custom_weights_flow_through() {
        let prompts = vec![prompt("q")];
        let completions = vec![completion(WELL_FORMED)];
        let answers = vec!["42".to_string()];
        let batch = RewardBatch::new(Some(&prompts), Some(&completions), Some(&answers));

        let weights = RewardWeights {
            correctness: 16.0,
            integer: 4.0,
            strict_format: 4.0,
            soft_format: 4.0,
            tag_count: 8.0,
        };
        let stack = RewardStack::new(&weights, None);
        let totals = stack.aggregate(&batch).unwrap();

        let expected = 16.0 + 4.0 + 4.0 + 4.0 + score_tags(Some(WELL_FORMED)) * 8.0;
        assert!((totals[0] - expected).abs() < 1e-9);
    }
}
