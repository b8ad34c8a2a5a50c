use anyhow::Result;
use log::debug;
use std::collections::HashMap;

use crate::rewards::aggregate::RewardStack;
use crate::rewards::batch::RewardBatch;
use crate::rewards::FALLBACK_REWARD;

use super::node::{HivemindNode, NodeOutputs};

/// How the swarm aggregator picks the completion to publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSelector {
    /// The completion with the highest total reward; ties break to the
    /// smallest index
    Max,
}

/// Scores a batch, publishes the winning completion and the full reward
/// vector into shared node state, and hands the trainer a zeroed vector.
///
/// The real reward signal travels through the node side channel; the
/// returned zeros keep the trainer's reward plumbing index-aligned
/// without double-counting.
pub struct SwarmAggregator {
    stack: RewardStack,
    selector: Option<OutputSelector>,
}

impl SwarmAggregator {
    pub fn new(stack: RewardStack, selector: Option<OutputSelector>) -> Self {
        Self { stack, selector }
    }

    /// Score the batch and publish into `node`.
    ///
    /// A missing node, prompts, or completions degrades to a single
    /// fallback element with no publication. With no selector the batch
    /// is still scored but nothing is written to the node.
    pub fn aggregate(
        &self,
        node: Option<&mut HivemindNode>,
        batch: &RewardBatch<'_>,
    ) -> Result<Vec<f64>> {
        let Some(node) = node else {
            return Ok(vec![FALLBACK_REWARD]);
        };
        if batch.prompts.is_none() || batch.completions.is_none() {
            return Ok(vec![FALLBACK_REWARD]);
        }

        let total = self.stack.aggregate(batch)?;

        if let Some(selector) = self.selector {
            // A batch that cannot elect a winner is scored as malformed
            // instead of being published.
            let (Some(question), Some(responses)) = (batch.question(), batch.completion_texts())
            else {
                return Ok(vec![FALLBACK_REWARD; batch.completion_count().max(1)]);
            };
            let Some(answer) = batch.answers.and_then(|a| a.first()) else {
                return Ok(vec![FALLBACK_REWARD; batch.completion_count().max(1)]);
            };
            if responses.is_empty() {
                return Ok(vec![FALLBACK_REWARD]);
            }

            let outputs = match selector {
                OutputSelector::Max => {
                    let winner = stable_max_index(&total);
                    debug!(
                        "Publishing completion {} (total {:.3}) to node {}",
                        winner, total[winner], node.key
                    );
                    NodeOutputs {
                        question: question.to_string(),
                        answer: answer.clone(),
                        agent_answers: HashMap::from([(
                            node.key.clone(),
                            responses[winner].to_string(),
                        )]),
                    }
                }
            };
            node.outputs = Some(outputs);
            node.rewards = total.clone();
        }

        Ok(vec![0.0; total.len()])
    }
}

/// Index of the maximum value; ties break to the first occurrence.
///
/// A stable scan keeps tie-breaking deterministic; callers must pass a
/// non-empty slice.
fn stable_max_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = idx;
        }
    }
    best
}
