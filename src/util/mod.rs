//! Internal utilities: arena storage and the deterministic RNG.

pub mod arena;
pub mod rng;

pub use arena::{Arena, ArenaIndex};
pub use rng::XorShift64;
