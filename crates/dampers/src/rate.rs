use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Force, Velocity},
    force::newton,
    velocity::meter_per_second,
};

/// A damping coefficient: force per unit damper velocity, in N/(m/s).
///
/// Coefficients are taken as configured. Physical dampers have non-negative
/// rates, but nothing here checks that.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DampingRate(f64);

impl DampingRate {
    /// Creates a rate in newton-seconds per meter.
    #[must_use]
    pub const fn new(newton_seconds_per_meter: f64) -> Self {
        Self(newton_seconds_per_meter)
    }

    /// Returns the rate in newton-seconds per meter.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Returns the viscous force opposing `velocity`: `F = -c * v`.
    #[must_use]
    pub fn resist(self, velocity: Velocity) -> Force {
        Force::new::<newton>(-self.0 * velocity.get::<meter_per_second>())
    }
}

impl From<f64> for DampingRate {
    fn from(newton_seconds_per_meter: f64) -> Self {
        Self(newton_seconds_per_meter)
    }
}
