//! Shared fixtures for the integration tests.

use strut_core::{ModelRegistry, ParamError, Parameters};
use strut_dampers::SuspEfDamper;

/// Damper parameters for a compact sedan.
pub const VEHICLE: &str = include_str!("../fixtures/vehicle.toml");

/// Parses [`VEHICLE`].
///
/// # Errors
///
/// Returns a [`ParamError`] if the fixture does not parse.
pub fn vehicle_params() -> Result<Parameters, ParamError> {
    Parameters::from_toml_str(VEHICLE)
}

/// A damper registry with every kind this workspace provides.
///
/// # Panics
///
/// Panics if a kind is registered twice.
#[must_use]
pub fn damper_registry() -> ModelRegistry<SuspEfDamper> {
    let mut registry = ModelRegistry::new();
    strut_dampers::register(&mut registry).expect("kinds are registered once");
    registry
}
