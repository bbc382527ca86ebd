use strut_core::{ModelClass, PerWheel};
use uom::si::{
    f64::{Force, Velocity},
    force::newton,
};

/// The external suspension damper model class.
///
/// Kinds of this class turn per-wheel damper velocities into per-wheel
/// damping forces once per simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspEfDamper;

impl SuspEfDamper {
    /// Parameter key that selects the damper kind, e.g. `"MyModel 1"`.
    pub const KIND_KEY: &'static str = "SuspEF.Damper.Kind";
}

impl ModelClass for SuspEfDamper {
    const NAME: &'static str = "SuspEF_Damper";
    type Interface = DamperInterface;
}

/// The per-step damper interface owned by the host.
///
/// Velocity is the damper's relative velocity: positive while extending
/// (pull), negative while compressing (push).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamperInterface {
    pub velocity: PerWheel<Velocity>,
    pub force: PerWheel<Force>,
}

impl DamperInterface {
    /// Creates an interface with the given velocities and zeroed forces.
    #[must_use]
    pub fn new(velocity: PerWheel<Velocity>) -> Self {
        Self {
            velocity,
            force: PerWheel::splat(Force::new::<newton>(0.0)),
        }
    }
}
