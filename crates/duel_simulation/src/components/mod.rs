//! ECS Components для бойцов (вне combat модуля)
//!
//! Организация по доменам:
//! - actor: Health
//! - movement: FighterInput, LocomotionRequest, PhysicsBody

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
