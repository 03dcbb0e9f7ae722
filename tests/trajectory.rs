use solar_conics::ephemeris::{BodyDefinition, BodyId, BodySystem};
use solar_conics::orbits::{Orbit, OrbitalElements, Primary};
use solar_conics::state::StateVector;
use solar_conics::trajectory::{
    Trajectory, TrajectoryConfig, TrajectoryError, TrajectoryRequest, TrajectorySection,
    find_intersection, plan_trajectory,
};
use solar_conics::vector;

const SUN_MU: f64 = 1.0e9;
const PLANET_ORBIT: f64 = 1.0e5;

fn circular(a: f64) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: a,
        eccentricity: 0.0,
        inclination: 0.0,
        ascending_node: 0.0,
        argument_of_periapsis: 0.0,
    }
}

/// Sun with one planet on a circular equatorial orbit at 1e5.
fn flyby_system() -> (BodySystem, BodyId) {
    let mut system = BodySystem::new(BodyDefinition::new("Sun", SUN_MU, f64::INFINITY));
    let planet = system
        .add_body(
            system.root(),
            BodyDefinition::new("Planet", 1.0e6, 5000.0),
            circular(PLANET_ORBIT),
        )
        .expect("planet");
    (system, planet)
}

/// Retrograde circular orbit slightly outside the planet's, placed ahead of it.
fn flyby_request(system: &BodySystem) -> TrajectoryRequest {
    let r = 1.02e5_f64;
    let phi = 0.6_f64;
    let v = (SUN_MU / r).sqrt();
    TrajectoryRequest {
        body: system.root(),
        state: StateVector::new(
            [r * phi.cos(), 0.0, -r * phi.sin()],
            [v * phi.sin(), 0.0, v * phi.cos()],
        ),
        time: 0.0,
    }
}

fn config(max_patches: usize) -> TrajectoryConfig {
    TrajectoryConfig {
        max_patches,
        ..TrajectoryConfig::default()
    }
}

#[test]
fn flyby_hands_off_into_the_planet_frame() {
    let (system, planet) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(2));
    let trajectory = &prediction.trajectory;
    assert_eq!(trajectory.len(), 2);

    let first = trajectory.get(0).unwrap();
    let second = trajectory.get(1).unwrap();
    assert_eq!(first.body(), system.root());
    assert!(first.orbit().is_elliptic());
    assert!(first.end_t().is_some());
    assert!(
        (first.duration() - 281.43).abs() < 0.5,
        "encounter after {}",
        first.duration()
    );

    assert_eq!(second.body(), planet);
    assert!(!second.orbit().is_elliptic());
    assert!((second.orbit().eccentricity() - 78.74).abs() < 0.5);

    let entry = second.evaluate(0.0);
    assert!((entry.radius() - 5000.0).abs() < 0.01, "entry radius {}", entry.radius());

    // no jump in the sun frame at the boundary
    let end_of_first = first.evaluate(first.duration());
    let start_of_second = entry + system.state_vector(planet, first.duration());
    let jump = vector::norm(&vector::sub(&end_of_first.position, &start_of_second.position));
    assert!(jump < 1e-6, "position jump {jump}");
}

#[test]
fn flyby_alternates_frames_until_the_patch_limit() {
    let (system, planet) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(5));
    let bodies: Vec<BodyId> = prediction.trajectory.sections().map(|s| s.body()).collect();
    let sun = system.root();
    assert_eq!(bodies, vec![sun, planet, sun, planet, sun]);

    let exit = prediction.trajectory.get(1).unwrap();
    let exit_radius = exit.evaluate(exit.duration()).radius();
    assert!((exit_radius - 5000.0).abs() < 1e-3, "exit radius {exit_radius}");
}

#[test]
fn boundaries_are_continuous_in_the_root_frame() {
    let (system, _) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(5));
    let epochs = prediction.section_epochs();
    let sections: Vec<&TrajectorySection> = prediction.trajectory.sections().collect();

    for k in 0..sections.len() - 1 {
        let (current, next) = (sections[k], sections[k + 1]);
        let boundary = epochs[k] + current.duration();
        assert!((boundary - epochs[k + 1]).abs() < 1e-9);

        let before = current.evaluate(current.duration())
            + system.global_state_vector(current.body(), boundary);
        let after = next.evaluate(0.0) + system.global_state_vector(next.body(), boundary);
        let jump = vector::norm(&vector::sub(&before.position, &after.position));
        assert!(jump < 1e-6, "jump {jump} at boundary {k}");
    }
}

#[test]
fn patch_count_never_exceeds_the_limit() {
    let (system, _) = flyby_system();
    let request = flyby_request(&system);
    for max_patches in 0..=6 {
        let prediction = plan_trajectory(&system, &request, &config(max_patches));
        assert!(prediction.trajectory.len() <= max_patches);
    }
    assert!(plan_trajectory(&system, &request, &config(0)).trajectory.is_empty());
}

#[test]
fn orbit_that_never_leaves_is_a_single_full_section() {
    let (system, planet) = flyby_system();
    let request = TrajectoryRequest {
        body: planet,
        state: StateVector::new([1000.0, 0.0, 0.0], [0.0, 0.0, -(1.0e6_f64 / 1000.0).sqrt()]),
        time: 42.0,
    };
    let prediction = plan_trajectory(&system, &request, &TrajectoryConfig::default());
    assert_eq!(prediction.epoch, 42.0);
    assert_eq!(prediction.trajectory.len(), 1);
    let only = prediction.trajectory.front().unwrap();
    assert!(only.is_full());
    assert_eq!(only.body(), planet);
    assert!(prediction.trajectory.total_duration().is_infinite());
}

#[test]
fn escape_from_a_child_ascends_to_the_parent() {
    let (system, planet) = flyby_system();
    let request = TrajectoryRequest {
        body: planet,
        state: StateVector::new([1000.0, 0.0, 0.0], [0.0, 0.0, -60.0]),
        time: 0.0,
    };
    let prediction = plan_trajectory(&system, &request, &config(2));
    let bodies: Vec<BodyId> = prediction.trajectory.sections().map(|s| s.body()).collect();
    assert_eq!(bodies, vec![planet, system.root()]);
    assert!(!prediction.trajectory.front().unwrap().orbit().is_elliptic());
}

#[test]
fn search_finds_the_planet_along_the_first_arc() {
    let (system, planet) = flyby_system();
    let request = flyby_request(&system);
    let (orbit, anomaly) = Orbit::from_state_vector(system.primary(system.root()), request.state);
    let start = orbit.true_anomaly_to_time(anomaly);
    let section = TrajectorySection::new(orbit, system.root(), start, None);

    let hit = find_intersection(&system, &section, 0.0, &TrajectoryConfig::default())
        .expect("planet encounter");
    assert_eq!(hit.body, planet);
    assert!(((hit.time - start) - 281.43).abs() < 0.5);
}

#[test]
fn search_skips_bodies_outside_the_radial_band() {
    let (system, _) = flyby_system();
    // circle at 3e5 never comes within the planet's band [0.95e5, 1.05e5]
    let orbit = Orbit::from_elements(system.primary(system.root()), circular(3.0e5));
    let section = TrajectorySection::new(orbit, system.root(), 0.0, None);
    assert_eq!(
        find_intersection(&system, &section, 0.0, &TrajectoryConfig::default()),
        None
    );
}

#[test]
fn bounded_elliptical_section_wraps_its_duration() {
    let (system, _) = flyby_system();
    let orbit = Orbit::from_elements(Primary::unbounded(SUN_MU), circular(PLANET_ORBIT));
    let period = orbit.period();
    let section = TrajectorySection::new(orbit, system.root(), 100.0, Some(40.0));
    assert!((section.duration() - (period - 60.0)).abs() < 1e-9);
}

fn section_around(system: &BodySystem, start_t: f64, end_t: Option<f64>) -> TrajectorySection {
    let orbit = Orbit::from_elements(system.primary(system.root()), circular(PLANET_ORBIT));
    TrajectorySection::new(orbit, system.root(), start_t, end_t)
}

#[test]
fn total_duration_stops_at_the_first_full_section() {
    let (system, _) = flyby_system();
    let mut trajectory = Trajectory::new();
    trajectory.push(section_around(&system, 0.0, Some(100.0)));
    trajectory.push(section_around(&system, 10.0, Some(60.0)));
    assert!((trajectory.total_duration() - 150.0).abs() < 1e-12);

    trajectory.push(section_around(&system, 0.0, None));
    trajectory.push(section_around(&system, 0.0, Some(5.0)));
    assert!(trajectory.total_duration().is_infinite());
}

#[test]
fn evaluate_walks_sections_in_order() {
    let (system, _) = flyby_system();
    let mut trajectory = Trajectory::new();
    trajectory.push(section_around(&system, 0.0, Some(100.0)));
    trajectory.push(section_around(&system, 500.0, Some(700.0)));

    let state = trajectory.evaluate(150.0).expect("inside second section");
    let expected = trajectory.get(1).unwrap().evaluate(50.0);
    assert!(vector::norm(&vector::sub(&state.position, &expected.position)) < 1e-9);

    let (section, local) = trajectory.locate(100.0).unwrap();
    assert_eq!(section.start_t(), 0.0);
    assert!((local - 100.0).abs() < 1e-12);

    match trajectory.evaluate(400.0) {
        Err(TrajectoryError::PastEnd { time, end }) => {
            assert_eq!(time, 400.0);
            assert!((end - 300.0).abs() < 1e-9);
        }
        other => panic!("expected past-end error, got {other:?}"),
    }
}

#[test]
fn global_evaluation_adds_the_body_chain() {
    let (system, planet) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(2));
    let t = prediction.trajectory.get(0).unwrap().duration() + 10.0;

    let local = prediction.trajectory.evaluate(t).unwrap();
    let global = prediction
        .trajectory
        .evaluate_global(&system, prediction.epoch, t)
        .unwrap();
    let planet_state = system.global_state_vector(planet, prediction.epoch + t);
    let expected = local + planet_state;
    assert!(vector::norm(&vector::sub(&global.position, &expected.position)) < 1e-9);
}

#[test]
fn skipping_an_empty_trajectory_is_an_error() {
    let (system, _) = flyby_system();
    let mut trajectory = Trajectory::new();
    assert!(matches!(trajectory.skip(), Err(TrajectoryError::Empty)));
    assert!(matches!(trajectory.evaluate(0.0), Err(TrajectoryError::Empty)));

    trajectory.push(section_around(&system, 0.0, Some(100.0)));
    trajectory.push(section_around(&system, 0.0, None));
    let dropped = trajectory.skip().expect("front section");
    assert_eq!(dropped.end_t(), Some(100.0));
    assert_eq!(trajectory.len(), 1);
    assert!(trajectory.front().unwrap().is_full());
    assert_eq!(trajectory.front(), trajectory.last());
}

#[test]
fn sections_iterator_restarts() {
    let (system, _) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(3));
    let sections = prediction.trajectory.sections();
    let first_pass = sections.clone().count();
    let second_pass = sections.count();
    assert_eq!(first_pass, 3);
    assert_eq!(first_pass, second_pass);
}

#[test]
fn outbound_start_on_the_soi_edge_ascends_without_stalling() {
    let (system, planet) = flyby_system();
    let request = TrajectoryRequest {
        body: planet,
        state: StateVector::new([5000.0 + 1e-9, 0.0, 0.0], [40.0, 0.0, -30.0]),
        time: 0.0,
    };
    let prediction = plan_trajectory(&system, &request, &config(3));
    let sections: Vec<&TrajectorySection> = prediction.trajectory.sections().collect();
    assert!(sections.len() >= 2);

    let first = sections[0];
    assert_eq!(first.body(), planet);
    assert!(!first.orbit().is_elliptic());
    assert!(first.duration() < 1e-6, "edge section lasted {}", first.duration());

    assert_eq!(sections[1].body(), system.root());
    for section in &sections {
        assert!(section.start_t().is_finite());
        assert!(section.orbit().semi_major_axis().is_finite());
        assert!(section.orbit().eccentricity().is_finite());
        assert!(!section.duration().is_nan());
    }
    for epoch in prediction.section_epochs() {
        assert!(epoch.is_finite());
    }
}

#[test]
fn inbound_start_on_the_soi_edge_descends_at_once() {
    let (system, planet) = flyby_system();
    let host = system.state_vector(planet, 0.0);
    let outward = vector::normalize(&host.position);
    // inbound and fast enough to be hyperbolic around the planet
    let offset = StateVector::new(
        vector::scale(&outward, 4999.999),
        vector::add(&vector::scale(&outward, -30.0), &[0.0, 10.0, 0.0]),
    );
    let request = TrajectoryRequest {
        body: system.root(),
        state: host + offset,
        time: 0.0,
    };
    let prediction = plan_trajectory(&system, &request, &config(2));
    let bodies: Vec<BodyId> = prediction.trajectory.sections().map(|s| s.body()).collect();
    assert_eq!(bodies, vec![system.root(), planet]);

    let first = prediction.trajectory.front().unwrap();
    assert_eq!(first.duration(), 0.0);
    let entry = prediction.trajectory.get(1).unwrap().evaluate(0.0);
    assert!((entry.radius() - 4999.999).abs() < 1e-3, "entry radius {}", entry.radius());
}

#[test]
fn rounding_before_the_start_is_not_a_wrap() {
    let (system, planet) = flyby_system();
    let orbit = Orbit::from_elements(system.primary(system.root()), circular(PLANET_ORBIT));
    let elliptic = TrajectorySection::new(orbit, system.root(), 100.0, Some(100.0 - 1e-9));
    assert_eq!(elliptic.duration(), 0.0);

    let (escape, _) = Orbit::from_state_vector(
        system.primary(planet),
        StateVector::new([1000.0, 0.0, 0.0], [0.0, 0.0, -60.0]),
    );
    assert!(!escape.is_elliptic());
    let hyperbolic = TrajectorySection::new(escape, planet, 50.0, Some(40.0));
    assert_eq!(hyperbolic.duration(), 0.0);
}

#[test]
fn patch_limit_leaves_the_pending_hand_off() {
    let (system, planet) = flyby_system();
    let request = flyby_request(&system);
    let short = plan_trajectory(&system, &request, &config(2));
    let next = short.next.expect("chain cut by the limit");
    assert_eq!(next.body, system.root());
    let end = short.epoch + short.trajectory.total_duration();
    assert!((next.time - end).abs() < 1e-9);

    // continuing from the hand-off reproduces the longer chain
    let long = plan_trajectory(&system, &request, &config(3));
    let resumed = plan_trajectory(&system, &next, &config(1));
    let expected = long.trajectory.get(2).unwrap();
    let got = resumed.trajectory.front().unwrap();
    assert_eq!(got.body(), expected.body());
    assert!((got.duration() - expected.duration()).abs() < 1e-6);

    let settled = plan_trajectory(
        &system,
        &TrajectoryRequest {
            body: planet,
            state: StateVector::new([1000.0, 0.0, 0.0], [0.0, 0.0, -(1.0e6_f64 / 1000.0).sqrt()]),
            time: 0.0,
        },
        &config(3),
    );
    assert_eq!(settled.next, None);
}
