//! Cargo derivation engine
//!
//! Pure, synchronous rules for chargeable weight/volume, dimensional
//! weight, effective service type resolution and payload normalization.

mod chargeable;
mod debounce;
mod dimensions;
mod normalize;
mod resolver;

pub use chargeable::*;
pub use debounce::*;
pub use dimensions::*;
pub use normalize::*;
pub use resolver::*;
