#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/phase.rs"]
pub mod phase;

#[path = "core/store.rs"]
pub mod store;

#[path = "core/sim.rs"]
pub mod sim;

pub mod panels;
