//! Combat components

pub mod fighter;
pub mod sequence;
pub mod volumes;


// Re-export all components
pub use fighter::*;
pub use sequence::*;
pub use volumes::*;
