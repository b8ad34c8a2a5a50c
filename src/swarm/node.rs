use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Winning output published for downstream consensus
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeOutputs {
    /// The question the batch was sampled for
    pub question: String,

    /// Ground-truth reference answer
    pub answer: String,

    /// Winning response text keyed by agent identity
    pub agent_answers: HashMap<String, String>,
}

/// Shared per-agent state replicated by the hivemind layer.
///
/// The swarm aggregator overwrites `outputs` and `rewards` on every
/// call; no history is kept here. Writes are not synchronized, so
/// callers must serialize access per node or accept last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct HivemindNode {
    /// Stable identity of this agent in the swarm
    pub key: String,

    /// Last published winning output
    pub outputs: Option<NodeOutputs>,

    /// Last published per-completion reward totals
    pub rewards: Vec<f64>,
}

impl HivemindNode {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            outputs: None,
            rewards: Vec::new(),
        }
    }
}
