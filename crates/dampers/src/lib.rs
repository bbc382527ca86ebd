//! External suspension damper force models.
//!
//! The [`SuspEfDamper`] class computes one damping force per wheel from the
//! damper's relative velocity each simulation step. [`LinearDamper`] is a
//! viscous damper with separate compression and extension rates; add it to a
//! host registry with [`register`].

mod class;
mod linear;
mod rate;

pub use class::{DamperInterface, SuspEfDamper};
pub use linear::{DamperModel, LinearDamper, PULL_KEY, PUSH_KEY, register};
pub use rate::DampingRate;
