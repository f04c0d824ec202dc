//! Physics simulation module
//!
//! Kinematic локомоция бойцов (lateral movement, jump, gravity, knockback friction).
//! Rapier используется только для геометрии volumes (см. combat::components::volumes).

pub mod movement;

// Re-export основных типов
pub use movement::{apply_ground_friction, apply_locomotion, integrate_motion, LocomotionPlugin};
