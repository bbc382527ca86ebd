use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use strut_core::{
    CalcError, ConstructContext, ConstructError, ExternalModel, Model, ModelKind, ModelRegistry,
    ParamError, ParameterSource, PerWheel, RegistryError, VersionId, Wheel, WheelNames,
};
use uom::si::f64::{Force, Time, Velocity};

use crate::{DamperInterface, DampingRate, SuspEfDamper};

/// Base parameter key for push-stroke rates; the wheel suffix is appended.
pub const PUSH_KEY: &str = "SFH.Damp_Push";

/// Base parameter key for pull-stroke rates; the wheel suffix is appended.
pub const PULL_KEY: &str = "SFH.Damp_Pull";

/// A linear damper with separate push and pull rates per wheel.
///
/// Each wheel's force opposes its damper velocity:
///
/// - extending (`v >= 0`): `F = -pull * v`
/// - compressing (`v < 0`): `F = -push * v`
///
/// Both branches give zero force at zero velocity, so the force law is
/// continuous. Wheels do not interact.
///
/// # Examples
///
/// ```
/// use strut_core::{Model, PerWheel, Wheel};
/// use strut_dampers::{DamperModel, DampingRate};
/// use uom::si::{f64::Velocity, force::newton, velocity::meter_per_second};
///
/// let damper = DamperModel::new(
///     PerWheel::splat(DampingRate::new(1000.0)),
///     PerWheel::splat(DampingRate::new(800.0)),
/// );
///
/// let velocity = PerWheel::from([0.1, -0.1, 0.0, 5.0])
///     .map(Velocity::new::<meter_per_second>);
/// let force = damper.call(&velocity).unwrap();
///
/// assert_eq!(force[Wheel::RearRight].get::<newton>(), -4000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DamperModel {
    /// Rates used while the damper compresses.
    pub push: PerWheel<DampingRate>,
    /// Rates used while the damper extends.
    pub pull: PerWheel<DampingRate>,
}

impl DamperModel {
    #[must_use]
    pub fn new(push: PerWheel<DampingRate>, pull: PerWheel<DampingRate>) -> Self {
        Self { push, pull }
    }

    /// Reads push and pull rates for every wheel.
    ///
    /// Keys are [`PUSH_KEY`] and [`PULL_KEY`] followed by the wheel's name
    /// suffix, for example `SFH.Damp_PushFL`. Values are used as read.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] for the first key that is missing or not a number.
    pub fn from_params(
        params: &dyn ParameterSource,
        wheels: &dyn WheelNames,
    ) -> Result<Self, ParamError> {
        let rate = |base: &str, wheel: Wheel| {
            let key = format!("{base}{}", wheels.suffix(wheel));
            params.get_f64(&key).map(DampingRate::new)
        };

        Ok(Self {
            push: PerWheel::try_from_fn(|wheel| rate(PUSH_KEY, wheel))?,
            pull: PerWheel::try_from_fn(|wheel| rate(PULL_KEY, wheel))?,
        })
    }

    /// Returns the damping force for one wheel.
    #[must_use]
    pub fn force(&self, wheel: Wheel, velocity: Velocity) -> Force {
        let rate = if velocity.value >= 0.0 {
            self.pull[wheel]
        } else {
            self.push[wheel]
        };
        rate.resist(velocity)
    }

    /// Returns the damping force for every wheel.
    #[must_use]
    pub fn forces(&self, velocity: &PerWheel<Velocity>) -> PerWheel<Force> {
        PerWheel::from_fn(|wheel| self.force(wheel, velocity[wheel]))
    }
}

impl Model for DamperModel {
    type Input = PerWheel<Velocity>;
    type Output = PerWheel<Force>;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.forces(input))
    }
}

impl ExternalModel<SuspEfDamper> for DamperModel {
    /// Writes this step's forces into the interface; `dt` is not needed.
    fn calc(&self, interface: &mut DamperInterface, _dt: Time) -> Result<(), CalcError> {
        for (wheel, force) in interface.force.iter_mut() {
            *force = self.force(wheel, interface.velocity[wheel]);
        }
        Ok(())
    }
}

/// The registered kind that builds [`DamperModel`] instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearDamper;

impl LinearDamper {
    /// Kind name the host selects this damper by.
    pub const NAME: &'static str = "MyModel";

    /// Newest interface version this kind supports.
    pub const VERSION: VersionId = VersionId::V1;
}

impl ModelKind<SuspEfDamper> for LinearDamper {
    fn version(&self) -> VersionId {
        Self::VERSION
    }

    fn construct(
        &self,
        ctx: &ConstructContext<'_, SuspEfDamper>,
    ) -> Result<Box<dyn ExternalModel<SuspEfDamper>>, ConstructError> {
        let info = ctx.kind_info(Self::NAME, Self::VERSION)?;
        let model = DamperModel::from_params(ctx.params, ctx.wheels)?;

        tracing::debug!(
            kind = %info.kind,
            version = %info.version,
            push = ?model.push.0.map(DampingRate::get),
            pull = ?model.pull.0.map(DampingRate::get),
            "constructed linear damper"
        );
        Ok(Box::new(model))
    }
}

/// Registers [`LinearDamper`] as kind [`LinearDamper::NAME`].
///
/// Call once while the host sets up its damper registry. The kind reads all
/// of its parameters from the host, so its parameters-changed check always
/// reports them unchanged.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateKind`] if the kind is already registered.
pub fn register(registry: &mut ModelRegistry<SuspEfDamper>) -> Result<(), RegistryError> {
    registry.register(LinearDamper::NAME, LinearDamper)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use strut_core::{
        KindError, ParamsChange, Parameters, QuantityDict, StandardWheelNames, status,
    };
    use uom::si::{force::newton, time::second, velocity::meter_per_second};

    fn rates(values: [f64; 4]) -> PerWheel<DampingRate> {
        PerWheel::from(values).map(DampingRate::new)
    }

    fn velocities(values: [f64; 4]) -> PerWheel<Velocity> {
        PerWheel::from(values).map(Velocity::new::<meter_per_second>)
    }

    fn newtons(force: PerWheel<Force>) -> [f64; 4] {
        force.map(|f| f.get::<newton>()).0
    }

    fn damper() -> DamperModel {
        DamperModel::new(
            rates([1000.0, 1000.0, 1200.0, 1200.0]),
            rates([800.0, 800.0, 900.0, 900.0]),
        )
    }

    fn params(kind: &str) -> Parameters {
        let mut params = Parameters::new().with(SuspEfDamper::KIND_KEY, kind);
        let (push, pull) = ([1000.0, 1000.0, 1200.0, 1200.0], [800.0, 800.0, 900.0, 900.0]);
        for wheel in Wheel::ALL {
            let suffix = StandardWheelNames.suffix(wheel);
            params.insert(format!("{PUSH_KEY}{suffix}"), push[wheel.index()]);
            params.insert(format!("{PULL_KEY}{suffix}"), pull[wheel.index()]);
        }
        params
    }

    fn construct(
        registry: &ModelRegistry<SuspEfDamper>,
        params: &Parameters,
    ) -> Result<Box<dyn ExternalModel<SuspEfDamper>>, ConstructError> {
        let ctx = ConstructContext {
            params,
            wheels: &StandardWheelNames,
            kind_key: SuspEfDamper::KIND_KEY,
            registry,
        };
        LinearDamper.construct(&ctx)
    }

    fn registry() -> ModelRegistry<SuspEfDamper> {
        let mut registry = ModelRegistry::new();
        register(&mut registry).unwrap();
        registry
    }

    #[test]
    fn mixed_strokes_per_wheel() {
        let force = damper()
            .call(&velocities([0.1, -0.1, 0.0, 5.0]))
            .unwrap();
        let [fl, fr, rl, rr] = newtons(force);

        assert_relative_eq!(fl, -80.0);
        assert_relative_eq!(fr, 100.0);
        assert_eq!(rl, 0.0);
        assert_relative_eq!(rr, -4500.0);
    }

    #[test]
    fn pull_stroke_uses_pull_rate() {
        let damper = damper();
        for v in [0.0, 0.01, 0.5, 3.0] {
            let force = damper.force(Wheel::RearLeft, Velocity::new::<meter_per_second>(v));
            assert_relative_eq!(force.get::<newton>(), -900.0 * v);
        }
    }

    #[test]
    fn push_stroke_uses_push_rate_and_pushes_back() {
        let damper = damper();
        for v in [-0.01, -0.5, -3.0] {
            let force = damper.force(Wheel::FrontLeft, Velocity::new::<meter_per_second>(v));
            assert_relative_eq!(force.get::<newton>(), -1000.0 * v);
            assert!(force.get::<newton>() > 0.0);
        }
    }

    #[test]
    fn zero_velocity_gives_zero_force_for_any_rates() {
        let damper = DamperModel::new(
            rates([1.0e6, 0.0, 37.5, -20.0]),
            rates([3.0, 1.0e9, 0.5, 12.0]),
        );
        let force = damper.forces(&PerWheel::splat(Velocity::new::<meter_per_second>(0.0)));
        for value in newtons(force) {
            assert_eq!(value.abs(), 0.0);
        }
    }

    #[test]
    fn wheels_are_independent() {
        let base = damper();
        let velocity = velocities([0.3, -0.2, 0.1, -0.4]);
        let before = newtons(base.forces(&velocity));

        let mut changed = base;
        changed.push[Wheel::FrontRight] = DampingRate::new(5000.0);
        changed.pull[Wheel::FrontRight] = DampingRate::new(5000.0);
        let mut other_velocity = velocity;
        other_velocity[Wheel::FrontRight] = Velocity::new::<meter_per_second>(2.0);

        let after = newtons(changed.forces(&other_velocity));
        for wheel in [Wheel::FrontLeft, Wheel::RearLeft, Wheel::RearRight] {
            assert_eq!(before[wheel.index()], after[wheel.index()]);
        }
        assert_relative_eq!(after[Wheel::FrontRight.index()], -10_000.0);
    }

    #[test]
    fn serializes_rates_per_wheel() {
        let json = serde_json::to_value(damper()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "push": [1000.0, 1000.0, 1200.0, 1200.0],
                "pull": [800.0, 800.0, 900.0, 900.0],
            })
        );
    }

    #[test]
    fn calc_writes_forces_into_interface() {
        let mut interface = DamperInterface::new(velocities([0.1, -0.1, 0.0, 5.0]));
        damper()
            .calc(&mut interface, Time::new::<second>(0.001))
            .unwrap();

        assert_eq!(newtons(interface.force), newtons(damper().forces(&interface.velocity)));
    }

    #[test]
    fn reads_rates_for_each_wheel() {
        let model = DamperModel::from_params(&params("MyModel"), &StandardWheelNames).unwrap();
        assert_eq!(model, damper());
    }

    #[test]
    fn custom_wheel_names_build_keys() {
        let names = |wheel: Wheel| format!("_{}", wheel.index());
        let params: Parameters = Wheel::ALL
            .iter()
            .flat_map(|&wheel| {
                let i = wheel.index();
                [
                    (format!("{PUSH_KEY}_{i}"), 100.0 * (i as f64 + 1.0)),
                    (format!("{PULL_KEY}_{i}"), 10.0 * (i as f64 + 1.0)),
                ]
            })
            .collect();

        let model = DamperModel::from_params(&params, &names).unwrap();
        assert_eq!(model.push, rates([100.0, 200.0, 300.0, 400.0]));
        assert_eq!(model.pull, rates([10.0, 20.0, 30.0, 40.0]));
    }

    #[test]
    fn missing_rate_fails() {
        let mut params = params("MyModel");
        params = params
            .iter()
            .filter(|(key, _)| *key != "SFH.Damp_PullRR")
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        let err = DamperModel::from_params(&params, &StandardWheelNames).unwrap_err();
        assert_eq!(
            err,
            ParamError::Missing {
                key: "SFH.Damp_PullRR".into()
            }
        );
    }

    #[test]
    fn construct_accepts_supported_versions() {
        let registry = registry();
        for kind in ["MyModel", "MyModel 1"] {
            assert!(construct(&registry, &params(kind)).is_ok(), "rejected {kind}");
        }
    }

    #[test]
    fn construct_rejects_unsupported_version() {
        let result = construct(&registry(), &params("MyModel 2"));
        assert!(matches!(
            result,
            Err(ConstructError::Kind(KindError::IncompatibleVersion { .. }))
        ));
    }

    #[test]
    fn construct_rejects_other_kinds() {
        let mut registry = registry();
        registry.register("Other", LinearDamper).unwrap();

        let result = construct(&registry, &params("Other"));
        assert!(matches!(
            result,
            Err(ConstructError::Kind(KindError::Mismatch { .. }))
        ));
    }

    #[test]
    fn construct_then_zero_velocity_gives_zero_force() {
        let model = construct(&registry(), &params("MyModel")).unwrap();
        let mut interface = DamperInterface::new(velocities([0.0; 4]));
        model.calc(&mut interface, Time::new::<second>(0.01)).unwrap();

        for value in newtons(interface.force) {
            assert_eq!(value.abs(), 0.0);
        }
    }

    #[test]
    fn declares_no_quantities() {
        let registry = registry();
        let model = construct(&registry, &params("MyModel")).unwrap();

        let mut dict = QuantityDict::new();
        model.declare_quantities(&mut dict).unwrap();
        LinearDamper.declare_static_quantities(&mut dict).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn register_once() {
        let mut registry = ModelRegistry::new();
        assert_eq!(status(&register(&mut registry)), 0);
        assert_eq!(status(&register(&mut registry)), -1);

        assert_eq!(registry.kinds().collect::<Vec<_>>(), ["MyModel"]);
        assert_eq!(
            registry.params_changed("MyModel", &Parameters::new()),
            Some(ParamsChange::Unchanged)
        );
    }
}
