use approx::assert_relative_eq;
use integration_tests::{damper_registry, vehicle_params};
use strut_core::{
    ConstructError, HandleError, KindError, PerWheel, QuantityDict, StandardWheelNames, Wheel,
};
use strut_dampers::{DamperInterface, LinearDamper, SuspEfDamper};
use uom::si::{
    f64::{Time, Velocity},
    force::newton,
    time::millisecond,
    velocity::meter_per_second,
};

fn dt() -> Time {
    Time::new::<millisecond>(1.0)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn full_lifecycle_from_vehicle_file() {
    init_tracing();

    let registry = damper_registry();
    let params = vehicle_params().unwrap();

    let mut dict = QuantityDict::new();
    registry
        .declare_quantities(LinearDamper::NAME, None, &mut dict)
        .unwrap();

    let mut handle = registry
        .instantiate(&params, &StandardWheelNames, SuspEfDamper::KIND_KEY)
        .unwrap();
    assert_eq!(handle.kind(), LinearDamper::NAME);

    registry
        .declare_quantities(LinearDamper::NAME, Some(&handle), &mut dict)
        .unwrap();
    assert!(dict.is_empty());

    let velocity = PerWheel::from([0.1, -0.1, 0.0, 5.0]).map(Velocity::new::<meter_per_second>);
    let mut interface = DamperInterface::new(velocity);
    handle.calc(&mut interface, dt()).unwrap();

    let force = interface.force.map(|f| f.get::<newton>());
    assert_relative_eq!(force[Wheel::FrontLeft], -80.0);
    assert_relative_eq!(force[Wheel::FrontRight], 100.0);
    assert_eq!(force[Wheel::RearLeft], 0.0);
    assert_relative_eq!(force[Wheel::RearRight], -4500.0);

    assert!(handle.destroy());
    assert!(!handle.destroy());
    assert!(matches!(
        handle.calc(&mut interface, dt()),
        Err(HandleError::Destroyed { .. })
    ));
}

#[test]
fn every_step_recomputes_from_the_interface() {
    let registry = damper_registry();
    let handle = registry
        .instantiate(&vehicle_params().unwrap(), &StandardWheelNames, SuspEfDamper::KIND_KEY)
        .unwrap();

    let mut interface = DamperInterface::new(PerWheel::splat(Velocity::new::<meter_per_second>(0.0)));
    for step in 0..100 {
        let v = (f64::from(step) * 0.1).sin();
        interface.velocity = PerWheel::splat(Velocity::new::<meter_per_second>(v));
        handle.calc(&mut interface, dt()).unwrap();

        let expected_rl = if v >= 0.0 { -900.0 * v } else { -1200.0 * v };
        assert_relative_eq!(
            interface.force[Wheel::RearLeft].get::<newton>(),
            expected_rl,
            epsilon = 1e-9
        );
    }
}

#[test]
fn newer_version_request_creates_no_handle() {
    let registry = damper_registry();
    let mut params = vehicle_params().unwrap();
    params.insert(SuspEfDamper::KIND_KEY, "MyModel 2");

    let result = registry.instantiate(&params, &StandardWheelNames, SuspEfDamper::KIND_KEY);
    assert!(matches!(
        result,
        Err(ConstructError::Kind(KindError::IncompatibleVersion { .. }))
    ));
}

#[test]
fn unregistered_kind_creates_no_handle() {
    let registry = damper_registry();
    let mut params = vehicle_params().unwrap();
    params.insert(SuspEfDamper::KIND_KEY, "Hydraulic");

    let result = registry.instantiate(&params, &StandardWheelNames, SuspEfDamper::KIND_KEY);
    assert!(matches!(
        result,
        Err(ConstructError::Kind(KindError::Unknown { .. }))
    ));
}

#[test]
fn vehicles_own_separate_instances() {
    let registry = damper_registry();
    let sedan = vehicle_params().unwrap();
    let mut truck = vehicle_params().unwrap();
    for wheel in ["FL", "FR", "RL", "RR"] {
        truck.insert(format!("SFH.Damp_Pull{wheel}"), 4000.0);
    }

    let sedan = registry
        .instantiate(&sedan, &StandardWheelNames, SuspEfDamper::KIND_KEY)
        .unwrap();
    let mut truck = registry
        .instantiate(&truck, &StandardWheelNames, SuspEfDamper::KIND_KEY)
        .unwrap();

    let velocity = PerWheel::splat(Velocity::new::<meter_per_second>(0.5));
    let mut sedan_io = DamperInterface::new(velocity);
    let mut truck_io = DamperInterface::new(velocity);
    sedan.calc(&mut sedan_io, dt()).unwrap();
    truck.calc(&mut truck_io, dt()).unwrap();

    assert_relative_eq!(sedan_io.force[Wheel::FrontLeft].get::<newton>(), -400.0);
    assert_relative_eq!(truck_io.force[Wheel::FrontLeft].get::<newton>(), -2000.0);

    truck.destroy();
    sedan.calc(&mut sedan_io, dt()).unwrap();
}
