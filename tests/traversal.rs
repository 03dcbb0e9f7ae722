use solar_conics::ephemeris::{BodyDefinition, BodyId, BodySystem};
use solar_conics::orbits::OrbitalElements;
use solar_conics::state::StateVector;
use solar_conics::trajectory::{
    MovingTarget, PredictionCache, Trajectory, TrajectoryConfig, TrajectoryError,
    TrajectoryRequest, Traversal, plan_trajectory,
};
use solar_conics::vector;

const SUN_MU: f64 = 1.0e9;

fn flyby_system() -> (BodySystem, BodyId) {
    let mut system = BodySystem::new(BodyDefinition::new("Sun", SUN_MU, f64::INFINITY));
    let planet = system
        .add_body(
            system.root(),
            BodyDefinition::new("Planet", 1.0e6, 5000.0),
            OrbitalElements {
                semi_major_axis: 1.0e5,
                eccentricity: 0.0,
                inclination: 0.0,
                ascending_node: 0.0,
                argument_of_periapsis: 0.0,
            },
        )
        .expect("planet");
    (system, planet)
}

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

/// Records every callback it receives.
#[derive(Default)]
struct Probe {
    parents: Vec<BodyId>,
    state: Option<StateVector>,
}

impl MovingTarget for Probe {
    fn reparent(&mut self, body: BodyId) {
        self.parents.push(body);
    }

    fn set_state(&mut self, state: StateVector) {
        self.state = Some(state);
    }
}

#[test]
fn advancing_inside_the_first_section_crosses_nothing() {
    let (system, _) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(5));
    let expected = prediction.trajectory.evaluate(100.0).unwrap();

    let mut traversal = Traversal::new(prediction.trajectory, prediction.epoch);
    let mut probe = Probe::default();
    assert_eq!(traversal.advance(100.0, &mut probe).unwrap(), 0);
    assert!(probe.parents.is_empty());
    assert_eq!(traversal.trajectory().len(), 5);

    let state = probe.state.expect("state set");
    assert!(vector::norm(&vector::sub(&state.position, &expected.position)) < 1e-9);
}

#[test]
fn crossing_a_boundary_reparents_the_target() {
    let (system, planet) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(5));
    let first_end = prediction.trajectory.front().unwrap().duration();

    let mut traversal = Traversal::new(prediction.trajectory.clone(), prediction.epoch);
    let mut probe = Probe::default();
    assert_eq!(traversal.advance(300.0, &mut probe).unwrap(), 1);
    assert_eq!(probe.parents, vec![planet]);
    assert_eq!(traversal.trajectory().len(), 4);
    assert!((traversal.boundary_time() - first_end).abs() < 1e-12);

    // leftover time carries into the planet section
    let expected = prediction.trajectory.get(1).unwrap().evaluate(300.0 - first_end);
    let state = probe.state.unwrap();
    assert!(vector::norm(&vector::sub(&state.position, &expected.position)) < 1e-9);
    assert!(state.radius() <= 5000.0 + 1e-3);
}

#[test]
fn one_large_step_crosses_several_boundaries() {
    let (system, planet) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(5));
    let epochs = prediction.section_epochs();
    let now = epochs[2] + 100.0;

    let mut traversal = Traversal::new(prediction.trajectory.clone(), prediction.epoch);
    let mut probe = Probe::default();
    assert_eq!(traversal.advance(now, &mut probe).unwrap(), 2);
    assert_eq!(probe.parents, vec![planet, system.root()]);
    assert!((traversal.boundary_time() - epochs[2]).abs() < 1e-9);

    let expected = prediction.trajectory.get(2).unwrap().evaluate(100.0);
    let state = probe.state.unwrap();
    assert!(vector::norm(&vector::sub(&state.position, &expected.position)) < 1e-6);
}

#[test]
fn running_past_the_last_section_is_reported() {
    let (system, _) = flyby_system();
    let prediction = plan_trajectory(&system, &flyby_request(&system), &config(2));
    let end = prediction.epoch + prediction.trajectory.total_duration();

    let mut traversal = Traversal::new(prediction.trajectory, prediction.epoch);
    let mut probe = Probe::default();
    match traversal.advance(end + 50.0, &mut probe) {
        Err(TrajectoryError::PastEnd { end: reported, .. }) => {
            assert!((reported - end).abs() < 1e-9);
        }
        other => panic!("expected past-end error, got {other:?}"),
    }
    // the final section is kept for the caller to replan from
    assert_eq!(traversal.trajectory().len(), 1);
    assert_eq!(probe.parents.len(), 1);
}

#[test]
fn terminal_full_section_absorbs_any_time() {
    let (system, planet) = flyby_system();
    let request = TrajectoryRequest {
        body: planet,
        state: StateVector::new([1000.0, 0.0, 0.0], [0.0, 0.0, -(1.0e6_f64 / 1000.0).sqrt()]),
        time: 0.0,
    };
    let prediction = plan_trajectory(&system, &request, &TrajectoryConfig::default());
    let mut traversal = Traversal::new(prediction.trajectory, prediction.epoch);
    let mut probe = Probe::default();
    assert_eq!(traversal.advance(1.0e7, &mut probe).unwrap(), 0);
    let radius = probe.state.unwrap().radius();
    assert!((radius - 1000.0).abs() < 1e-3, "radius {radius}");
}

#[test]
fn empty_trajectory_cannot_be_traversed() {
    let mut traversal = Traversal::new(Trajectory::new(), 0.0);
    let mut probe = Probe::default();
    assert!(matches!(
        traversal.advance(1.0, &mut probe),
        Err(TrajectoryError::Empty)
    ));
    assert!(probe.state.is_none());
}

#[test]
fn cache_rebuilds_only_when_inputs_change() {
    let (system, _) = flyby_system();
    let request = flyby_request(&system);
    let mut cache = PredictionCache::new();
    assert_eq!(cache.rebuilds(), 0);

    let first = cache.get_or_plan(&system, &request, &config(5)).clone();
    assert_eq!(first.trajectory.len(), 5);
    cache.get_or_plan(&system, &request, &config(5));
    assert_eq!(cache.rebuilds(), 1);
    assert!(cache.is_current(&request, &config(5)));
    assert!(!cache.is_current(&request, &config(2)));

    let shorter = cache.get_or_plan(&system, &request, &config(2));
    assert_eq!(shorter.trajectory.len(), 2);
    assert_eq!(cache.rebuilds(), 2);

    let moved = TrajectoryRequest {
        time: 10.0,
        ..request
    };
    let replanned = cache.get_or_plan(&system, &moved, &config(2));
    assert_eq!(replanned.epoch, 10.0);
    assert_eq!(cache.rebuilds(), 3);
    assert!(!cache.is_current(&request, &config(2)));
}

#[test]
fn invalidate_forces_a_rebuild() {
    let (system, _) = flyby_system();
    let request = flyby_request(&system);
    let mut cache = PredictionCache::new();
    cache.get_or_plan(&system, &request, &config(3));
    cache.invalidate();
    assert!(!cache.is_current(&request, &config(3)));
    cache.get_or_plan(&system, &request, &config(3));
    assert_eq!(cache.rebuilds(), 2);
}
