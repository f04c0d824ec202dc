//! Combat systems (порядок задаётся в `CombatPlugin`)

pub mod facing;
pub mod input;
pub mod resolve;
pub mod sequence;
pub mod stun;
pub mod volumes;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod input_tests;

// Re-export all systems
pub use facing::*;
pub use input::*;
pub use resolve::*;
pub use sequence::*;
pub use stun::*;
pub use volumes::*;
