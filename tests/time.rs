use solar_conics::time::{SimClock, TimeScaleLadder};

#[test]
fn clock_scales_each_step_by_the_given_rate() {
    let mut clock = SimClock::new(100.0);
    assert_eq!(clock.now(), 100.0);
    assert_eq!(clock.step(0.5, 1.0), 100.5);
    assert_eq!(clock.step(0.5, 10.0), 105.5);
    assert_eq!(clock.step(1.0, 0.0), 105.5);
    assert_eq!(clock.now(), 105.5);
}

#[test]
fn ladder_clamps_at_both_ends() {
    let mut ladder = TimeScaleLadder::default();
    assert_eq!(ladder.current(), 1.0);
    assert_eq!(ladder.lower(), 1.0);
    assert_eq!(ladder.raise(), 10.0);
    assert_eq!(ladder.raise(), 100.0);
    for _ in 0..10 {
        ladder.raise();
    }
    assert_eq!(ladder.current(), 10_000.0);
    assert_eq!(ladder.lower(), 1_000.0);
    assert_eq!(ladder.reset(), 1.0);
}

#[test]
fn empty_ladder_falls_back_to_real_time() {
    let mut ladder = TimeScaleLadder::new(Vec::new());
    assert_eq!(ladder.current(), 1.0);
    assert_eq!(ladder.raise(), 1.0);
}
