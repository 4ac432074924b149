#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]

//! Physics behavior of the three integrators: energy drift, oscillation
//! period, determinism, chaotic divergence, the denominator guard, projectile
//! range and ground impact, and start-validation boundaries.

use mechanics::chaos::{separation_run, SeparationConfig};
use mechanics::projectile::GROUND_LAUNCH_GRACE;
use mechanics::{
    angular_accelerations, fps, AngularState, ArmParams, DoublePendulum, DoublePendulumParams,
    Projectile, ProjectileParams, Simulation, SimplePendulum, SimplePendulumParams,
    ValidationError, GRAVITY, LAUNCH_X,
};

// =============================================================================
// Simple pendulum: energy drift
// =============================================================================

fn relative_drift(length: f64, angle: f64, dt: f64, steps: usize) -> f64 {
    let mut p = SimplePendulum::new(SimplePendulumParams::new(length, 1.0, angle));
    p.start().unwrap();
    let e0 = p.total_energy();
    let mut worst: f64 = 0.0;
    for _ in 0..steps {
        p.step(dt);
        worst = worst.max((p.total_energy() - e0).abs() / e0);
    }
    worst
}

#[test]
fn simple_energy_drift_within_euler_bound() {
    for &length in &[1.0, 5.0] {
        for &angle in &[30.0, 90.0, 150.0] {
            for &dt in &[fps(30), fps(60), fps(240)] {
                let steps = (100.0 / dt) as usize;
                let omega_dt = (GRAVITY / length).sqrt() * dt;
                let bound = 2.0 * omega_dt + 0.25 * omega_dt * omega_dt * steps as f64;
                let drift = relative_drift(length, angle, dt, steps);
                assert!(
                    drift <= bound,
                    "L={length} θ0={angle} dt={dt}: drift {drift} exceeds bound {bound}"
                );
            }
        }
    }
}

#[test]
fn simple_energy_drift_short_horizon_stays_small() {
    // 10 seconds at 60 FPS from 30°.
    let drift = relative_drift(1.0, 30.0, fps(60), 600);
    let omega_dt = GRAVITY.sqrt() * fps(60);
    assert!(drift <= 2.0 * omega_dt, "drift {drift}");
    assert!(drift > 0.0, "Euler integration should not conserve energy exactly");
}

#[test]
fn simple_energy_drift_shrinks_with_dt() {
    let coarse = relative_drift(1.0, 60.0, fps(30), 300);
    let fine = relative_drift(1.0, 60.0, fps(600), 6000);
    assert!(fine < coarse, "fine={fine} coarse={coarse}");
}

// =============================================================================
// Simple pendulum: small-angle period
// =============================================================================

/// Period measured from successive zero crossings of the angle.
fn measured_period(length: f64, angle: f64, dt: f64, duration: f64) -> f64 {
    let mut p = SimplePendulum::new(SimplePendulumParams::new(length, 1.0, angle));
    p.start().unwrap();
    let mut crossings = Vec::new();
    let mut prev = p.arm().angle;
    let steps = (duration / dt) as usize;
    for _ in 0..steps {
        p.step(dt);
        let cur = p.arm().angle;
        if prev.signum() != cur.signum() && cur != 0.0 {
            // Linear interpolation inside the step.
            let frac = prev / (prev - cur);
            crossings.push(p.elapsed() - dt + frac * dt);
        }
        prev = cur;
    }
    assert!(crossings.len() >= 4, "too few crossings: {}", crossings.len());
    let span = crossings[crossings.len() - 1] - crossings[0];
    2.0 * span / (crossings.len() - 1) as f64
}

#[test]
fn small_angle_period_matches_formula() {
    for &length in &[0.5, 1.0, 5.0] {
        let expected = std::f64::consts::TAU * (length / GRAVITY).sqrt();
        let period = measured_period(length, 5.0, fps(600), 6.0 * expected);
        let error = (period - expected).abs() / expected;
        assert!(error < 0.01, "L={length}: period {period} vs {expected}");
    }
}

#[test]
fn small_angle_period_at_frame_rate() {
    let expected = std::f64::consts::TAU * (1.0 / GRAVITY).sqrt();
    let period = measured_period(1.0, 5.0, fps(60), 8.0 * expected);
    assert!((period - expected).abs() / expected < 0.03);
}

#[test]
fn large_amplitude_period_is_longer() {
    let small = measured_period(1.0, 5.0, fps(600), 15.0);
    let large = measured_period(1.0, 120.0, fps(600), 15.0);
    assert!(large > small * 1.2, "large={large} small={small}");
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn simple_pendulum_is_deterministic() {
    let run = || {
        let mut p = SimplePendulum::new(SimplePendulumParams::new(2.0, 1.0, 75.0));
        p.start().unwrap();
        (0..1000)
            .map(|_| {
                p.step(fps(60));
                p.snapshot()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn double_pendulum_is_deterministic() {
    let dts = [fps(60), fps(30), fps(120), 0.003];
    let run = || {
        let mut p = DoublePendulum::new(DoublePendulumParams::default());
        p.start().unwrap();
        for i in 0..3000 {
            p.step(dts[i % dts.len()]);
        }
        (p.snapshot(), p.trace().to_vec())
    };
    assert_eq!(run(), run());
}

#[test]
fn cloned_instances_evolve_independently() {
    let mut a = DoublePendulum::new(DoublePendulumParams::default());
    a.start().unwrap();
    for _ in 0..100 {
        a.step(fps(60));
    }
    let mut b = a.clone();
    for _ in 0..100 {
        b.step(fps(60));
    }
    assert!((a.elapsed() - 100.0 * fps(60)).abs() < 1e-9);
    assert_eq!(a.trace().len(), 100);
    assert_eq!(b.trace().len(), 200);
    assert_ne!(a.snapshot(), b.snapshot());
}

// =============================================================================
// Double pendulum: chaos and the denominator guard
// =============================================================================

#[test]
fn nearby_starts_diverge() {
    let arm = ArmParams::new(1.0, 1.0);
    let candidates = [
        DoublePendulumParams::new(arm, arm, 120.0, 120.0),
        DoublePendulumParams::new(arm, arm, 90.0, 90.0),
        DoublePendulumParams::new(arm, arm, 135.0, -45.0),
        DoublePendulumParams::default(),
    ];
    let config = SeparationConfig::new(fps(100), 10_000);

    let runs: Vec<_> = candidates
        .iter()
        .map(|params| separation_run(params, &config).unwrap())
        .collect();

    assert!(
        runs.iter().any(|run| run.diverged()),
        "no parameter set diverged: {runs:?}"
    );
    for run in &runs {
        assert!(run.max_separation.is_finite());
        assert!(run.final_separation <= run.max_separation);
    }
}

#[test]
fn divergence_needs_time() {
    let arm = ArmParams::new(1.0, 1.0);
    let params = DoublePendulumParams::new(arm, arm, 120.0, 120.0);
    let run = separation_run(&params, &SeparationConfig::new(fps(100), 10)).unwrap();
    // A 1e-6 rad nudge cannot become a 1 cm gap in a tenth of a second.
    assert!(!run.diverged());
    assert!(run.max_separation < 1e-4);
}

#[test]
fn double_pendulum_stays_finite_for_a_minute() {
    let mut p = DoublePendulum::new(DoublePendulumParams::default());
    p.start().unwrap();
    for _ in 0..3600 {
        p.step(fps(60));
    }
    let s = p.snapshot();
    assert!(s.upper_bob.is_finite());
    assert!(s.lower_bob.is_finite());
    assert!(s.upper.angular_velocity.is_finite());
    assert!(s.lower.angular_velocity.is_finite());
    // Rigid rods: the lower bob never leaves the reachable disc.
    assert!(s.lower_bob.distance(mechanics::Point::origin()) <= 4.0 + 1e-9);
}

#[test]
fn double_pendulum_energy_drift_is_small_at_fine_dt() {
    let mut p = DoublePendulum::new(DoublePendulumParams::default());
    p.start().unwrap();
    let e0 = p.total_energy();
    // Energy scale: both bobs raised from their lowest point to the pivot.
    let scale = (1.0 + 1.0) * GRAVITY * 2.0 + 1.0 * GRAVITY * 2.0;
    for _ in 0..5000 {
        p.step(0.001);
    }
    let drift = (p.total_energy() - e0).abs() / scale;
    assert!(drift < 0.05, "drift {drift}");
}

#[test]
fn zero_denominator_gives_finite_acceleration() {
    // θ1 == θ2 makes cos 2δ = 1; M1 = 0 then cancels the denominator exactly.
    let lower = ArmParams::new(1.0, 1.0);
    let upper = ArmParams::new(1.0, 0.0);
    for &angle in &[0.0, 10.0, 45.0, 90.0, 179.0, -60.0] {
        let mut state = AngularState::at_rest(angle);
        state.angular_velocity = 2.0;
        let (a1, a2) = angular_accelerations(&state, &state, &upper, &lower, GRAVITY);
        assert!(a1.is_finite(), "α1 not finite at {angle}°: {a1}");
        assert!(a2.is_finite(), "α2 not finite at {angle}°: {a2}");
    }
}

#[test]
fn near_zero_denominator_is_large_but_finite() {
    let upper = ArmParams::new(1.0, 1e-12);
    let lower = ArmParams::new(1.0, 1.0);
    let theta1 = AngularState::at_rest(30.0);
    let theta2 = AngularState::at_rest(30.0 + 1e-3);
    let (a1, a2) = angular_accelerations(&theta1, &theta2, &upper, &lower, GRAVITY);
    assert!(a1.is_finite());
    assert!(a2.is_finite());
}

// =============================================================================
// Projectile: range and ground impact
// =============================================================================

fn landed_range(params: ProjectileParams, dt: f64) -> (f64, f64) {
    let mut p = Projectile::new(params);
    p.start().unwrap();
    let mut guard = 0;
    while p.is_running() {
        p.step(dt);
        guard += 1;
        assert!(guard < 10_000_000, "projectile never landed");
    }
    (p.range().unwrap(), p.elapsed())
}

#[test]
fn projectile_range_matches_closed_form() {
    let params = ProjectileParams::new(10.0, 45.0, 0.0);
    let expected = 10.0 * 10.0 * (90f64).to_radians().sin() / GRAVITY;
    assert!((expected - 10.19).abs() < 0.01);

    let (range, _) = landed_range(params, fps(60));
    assert!(
        (range - expected).abs() / expected < 0.02,
        "range {range} vs {expected}"
    );
}

#[test]
fn projectile_range_tightens_as_dt_shrinks() {
    let params = ProjectileParams::new(10.0, 45.0, 0.0);
    let expected = Projectile::new(params).analytic_range();
    let coarse = (landed_range(params, fps(30)).0 - expected).abs();
    let fine = (landed_range(params, 0.001).0 - expected).abs();
    assert!(fine < coarse, "fine={fine} coarse={coarse}");
    assert!(fine / expected < 0.002);
}

#[test]
fn projectile_flight_time_matches_closed_form() {
    // From a height: solve h + vy t − g t²/2 = 0.
    let params = ProjectileParams::new(12.0, 30.0, 3.0);
    let vy = 12.0 * 30f64.to_radians().sin();
    let expected = (vy + (vy * vy + 2.0 * GRAVITY * 3.0).sqrt()) / GRAVITY;
    let (_, time) = landed_range(params, 0.001);
    assert!((time - expected).abs() < 0.01, "time {time} vs {expected}");
}

#[test]
fn ground_launch_clears_ground_before_landing() {
    let mut p = Projectile::new(ProjectileParams::new(10.0, 45.0, 0.0));
    p.start().unwrap();
    p.step(fps(60));
    assert!(p.is_running(), "must not land on the first step");
    assert!(p.position().y > 0.0);
    while p.is_running() {
        p.step(fps(60));
    }
    assert!(p.elapsed() > 1.0);
    assert_eq!(p.position().y, 0.0);
}

#[test]
fn horizontal_ground_launch_lands_after_grace_period() {
    // A 0° launch from the ground dips below it at once. It only counts as
    // landed once the grace period has passed.
    let dt = fps(60);
    let mut p = Projectile::new(ProjectileParams::new(6.0, 0.0, 0.0));
    p.start().unwrap();
    p.step(dt);
    assert!(p.is_running());
    assert!(p.position().y < 0.0);

    while p.is_running() {
        p.step(dt);
    }
    assert!(p.elapsed() > GROUND_LAUNCH_GRACE);
    assert!(p.elapsed() <= GROUND_LAUNCH_GRACE + dt + 1e-12);
    assert_eq!(p.position().y, 0.0);
    let range = p.range().unwrap();
    assert!((range - 6.0 * p.elapsed()).abs() < 1e-9);
}

#[test]
fn vertical_ground_launch_lands_at_launch_point() {
    let (range, time) = landed_range(ProjectileParams::new(10.0, 90.0, 0.0), 0.001);
    assert!(range < 1e-9);
    assert!((time - 2.0 * 10.0 / GRAVITY).abs() < 0.01);
}

#[test]
fn launch_below_ground_never_lands() {
    let mut p = Projectile::new(ProjectileParams::new(5.0, 10.0, -1.0));
    p.start().unwrap();
    for _ in 0..600 {
        p.step(fps(60));
    }
    assert!(p.is_running());
    assert!(p.position().y < -1.0);
    assert_eq!(p.range(), None);
}

#[test]
fn projectile_trace_bounded_and_recent() {
    let mut p = Projectile::new(ProjectileParams::new(1.0, 10.0, -1.0));
    p.start().unwrap();
    for _ in 0..1500 {
        p.step(fps(60));
    }
    assert_eq!(p.trace().len(), 1000);
    assert_eq!(p.trace().last(), Some(p.position()));
    // The launch point has been evicted.
    assert!(p.trace().first().unwrap().x > LAUNCH_X);
}

// =============================================================================
// Start-validation boundaries
// =============================================================================

#[test]
fn simple_pendulum_angle_boundaries() {
    let accepts = |angle: f64| {
        SimplePendulum::new(SimplePendulumParams::new(1.0, 1.0, angle))
            .start()
            .is_ok()
    };
    assert!(accepts(170.0));
    assert!(accepts(-170.0));
    assert!(accepts(0.0));
    assert!(!accepts(170.0001));
    assert!(!accepts(-170.0001));
    assert!(!accepts(f64::NAN));
}

#[test]
fn simple_pendulum_rejection_leaves_reset_state() {
    let mut p = SimplePendulum::new(SimplePendulumParams::new(1.0, 1.0, 170.0001));
    let before = p.snapshot();
    let err = p.start().unwrap_err();
    assert!(matches!(err, ValidationError::AngleOutOfRange { max, .. } if max == 170.0));
    assert_eq!(p.snapshot(), before);
    p.step(fps(60));
    assert_eq!(p.snapshot(), before);
}

#[test]
fn projectile_speed_and_angle_boundaries() {
    let accepts = |speed: f64, angle: f64| {
        Projectile::new(ProjectileParams::new(speed, angle, 1.0))
            .start()
            .is_ok()
    };
    assert!(!accepts(0.0, 45.0));
    assert!(!accepts(-1.0, 45.0));
    assert!(accepts(1e-9, 45.0));
    assert!(accepts(10.0, 90.0));
    assert!(!accepts(10.0, 90.0001));
    assert!(accepts(10.0, 0.0));
    assert!(!accepts(10.0, -0.0001));
}

#[test]
fn double_pendulum_accepts_any_angle() {
    let arm = ArmParams::new(1.0, 1.0);
    for &(t1, t2) in &[(180.0, 180.0), (720.0, -540.0), (-3.0, 359.0)] {
        let mut p = DoublePendulum::new(DoublePendulumParams::new(arm, arm, t1, t2));
        assert!(p.start().is_ok());
    }
}

const NON_FINITE: [f64; 3] = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY];

#[test]
fn projectile_rejects_non_finite_height_and_speed() {
    for value in NON_FINITE {
        let mut ball = Projectile::new(ProjectileParams::new(10.0, 45.0, value));
        assert!(matches!(
            ball.start(),
            Err(ValidationError::NonFinite { parameter: "initial height", .. })
        ));
        assert!(!ball.is_running());
        ball.step(fps(60));
        assert_eq!(ball.elapsed(), 0.0);
        assert!(ball.trace().is_empty());
    }

    let mut ball = Projectile::new(ProjectileParams::new(f64::INFINITY, 45.0, 1.0));
    assert!(matches!(
        ball.start(),
        Err(ValidationError::NonFinite { parameter: "launch speed", .. })
    ));
}

#[test]
fn double_pendulum_rejects_non_finite_angles() {
    let arm = ArmParams::new(1.0, 1.0);
    for value in NON_FINITE {
        let mut upper = DoublePendulum::new(DoublePendulumParams::new(arm, arm, value, 0.0));
        assert!(matches!(
            upper.start(),
            Err(ValidationError::NonFinite { parameter: "upper angle", .. })
        ));
        assert!(!upper.is_running());

        let mut lower = DoublePendulum::new(DoublePendulumParams::new(arm, arm, 0.0, value));
        assert!(matches!(
            lower.start(),
            Err(ValidationError::NonFinite { parameter: "lower angle", .. })
        ));
        assert!(!lower.is_running());
    }
}

#[test]
fn infinite_arm_rejected() {
    let arm = ArmParams::new(1.0, 1.0);
    let long = ArmParams::new(f64::INFINITY, 1.0);
    let mut p = DoublePendulum::new(DoublePendulumParams::new(arm, long, 30.0, 0.0));
    assert!(matches!(
        p.start(),
        Err(ValidationError::NonFinite { parameter: "lower arm length", .. })
    ));

    let mut s = SimplePendulum::new(SimplePendulumParams::new(1.0, f64::INFINITY, 30.0));
    assert!(matches!(
        s.start(),
        Err(ValidationError::NonFinite { parameter: "pendulum mass", .. })
    ));
}

#[test]
fn reset_always_zeroes_elapsed() {
    let mut p = SimplePendulum::new(SimplePendulumParams::default());
    // Never started.
    p.reset(SimplePendulumParams::new(0.0, 0.0, 0.0));
    assert_eq!(p.elapsed(), 0.0);

    p.reset(SimplePendulumParams::default());
    p.start().unwrap();
    for _ in 0..60 {
        p.step(fps(60));
    }
    assert!(p.elapsed() > 0.0);
    p.reset(SimplePendulumParams::default());
    assert_eq!(p.elapsed(), 0.0);
    assert!(!p.is_running());
}

#[test]
fn angles_are_not_wrapped() {
    let arm = ArmParams::new(1.0, 1.0);
    let mut d = DoublePendulum::new(DoublePendulumParams::new(arm, arm, 720.0, 0.0));
    d.start().unwrap();
    assert!((d.upper().angle - 4.0 * std::f64::consts::PI).abs() < 1e-12);

    // Same physical configuration as 0°, so the same motion.
    let mut reference = DoublePendulum::new(DoublePendulumParams::new(arm, arm, 0.0, 0.0));
    reference.start().unwrap();
    d.step(fps(60));
    reference.step(fps(60));
    assert!(d.lower_bob().distance(reference.lower_bob()) < 1e-9);
    assert!(d.upper().angle > 12.0);
}
