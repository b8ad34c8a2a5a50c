//! Swarm-side aggregation: winner selection and shared-node publication.

pub mod aggregate;
pub mod node;

pub use aggregate::*;
pub use node::*;
