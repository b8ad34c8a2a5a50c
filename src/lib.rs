pub mod core;
pub mod rewards;
pub mod swarm;
