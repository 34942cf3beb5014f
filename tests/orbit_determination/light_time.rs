/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use crate::test_epoch;
use nyx_measurements::ad::{Gradient, Instant, Real};
use nyx_measurements::cosmic::{
    PvCoordinates, PvProvider, TimeStampedPv, EARTH_J2000, SPEED_OF_LIGHT_KM_S,
};
use nyx_measurements::linalg::Vector3;
use nyx_measurements::od::signal::{Convergence, TravelTimeSolver};
use nyx_measurements::utils::ulp;
use rand::Rng;
use rand_pcg::Pcg64Mcg;
use rstest::*;

#[fixture]
fn solver() -> TravelTimeSolver {
    let _ = pretty_env_logger::try_init();
    TravelTimeSolver::default()
}

/// A point moving uniformly, known at the test epoch.
fn uniform(position: Vector3<f64>, velocity: Vector3<f64>) -> TimeStampedPv<f64> {
    TimeStampedPv::new(
        Instant::at(test_epoch()),
        EARTH_J2000,
        PvCoordinates::from_pv(position, velocity),
    )
}

#[rstest]
fn emitter_delay_is_self_consistent(solver: TravelTimeSolver) {
    let mut rng = Pcg64Mcg::new(0x5eed);
    let arrival = Instant::at(test_epoch());
    for _ in 0..50 {
        let emitter = uniform(
            Vector3::new(
                rng.gen_range(-40_000.0..40_000.0),
                rng.gen_range(-40_000.0..40_000.0),
                rng.gen_range(-40_000.0..40_000.0),
            ),
            Vector3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            ),
        );
        let receiver = Vector3::new(
            rng.gen_range(-7_000.0..7_000.0),
            rng.gen_range(-7_000.0..7_000.0),
            rng.gen_range(-7_000.0..7_000.0),
        );

        let lt = solver
            .adjustable_emitter(&emitter)
            .delay(&receiver, &arrival, EARTH_J2000)
            .unwrap();
        assert!(lt.converged, "{lt}");

        let at_emission = emitter
            .position_at(&arrival.shifted_by(-lt.delay), EARTH_J2000)
            .unwrap();
        let residual = ((receiver - at_emission).norm() / SPEED_OF_LIGHT_KM_S - lt.delay).abs();
        assert!(
            residual <= 4.0 * ulp(lt.delay),
            "residual of {residual:e} s for {lt}"
        );
    }
}

#[rstest]
fn emitter_and_receiver_agree(solver: TravelTimeSolver) {
    let arrival = Instant::at(test_epoch());
    let ground = Vector3::new(6378.0, 0.0, 0.0);
    let satellite = uniform(Vector3::new(7000.0, 1200.0, -300.0), Vector3::new(0.5, 7.2, 1.1));

    // The satellite emits, the ground receives at the arrival
    let downlink = solver
        .adjustable_emitter(&satellite)
        .delay(&ground, &arrival, EARTH_J2000)
        .unwrap();
    let emission = arrival.shifted_by(-downlink.delay);
    let emitted_from = satellite.position_at(&emission, EARTH_J2000).unwrap();

    // The same signal, seen from the emission: the ground is the receiver to be found
    let fixed_ground = uniform(ground, Vector3::zeros());
    let reception = solver
        .adjustable_receiver(&fixed_ground)
        .delay(&emitted_from, &emission, EARTH_J2000)
        .unwrap();

    assert!(reception.converged);
    assert!(
        (reception.delay - downlink.delay).abs() <= 4.0 * ulp(downlink.delay),
        "{reception} vs {downlink}"
    );

    // And the satellite receiving a signal from the ground moves during the uplink
    let uplink = solver
        .adjustable_receiver(&satellite)
        .delay(&ground, &emission, EARTH_J2000)
        .unwrap();
    let received_at = satellite
        .position_at(&emission.shifted_by(uplink.delay), EARTH_J2000)
        .unwrap();
    let residual = ((received_at - ground).norm() / SPEED_OF_LIGHT_KM_S - uplink.delay).abs();
    assert!(residual <= 4.0 * ulp(uplink.delay));
}

#[rstest]
fn super_luminal_provider_stays_finite(solver: TravelTimeSolver) {
    let arrival = Instant::at(test_epoch());
    let runaway = uniform(
        Vector3::new(1000.0, 0.0, 0.0),
        Vector3::new(3.0 * SPEED_OF_LIGHT_KM_S, 0.0, 0.0),
    );
    let lt = solver
        .adjustable_emitter(&runaway)
        .delay(&Vector3::zeros(), &arrival, EARTH_J2000)
        .unwrap();
    assert!(!lt.converged);
    assert_eq!(lt.iterations, solver.max_iterations + 1);
    assert!(lt.delay.is_finite());
    assert!(lt.delay > 0.0);
}

#[rstest]
fn tolerance_and_instantaneous() {
    let arrival = Instant::at(test_epoch());
    let satellite = uniform(Vector3::new(26_000.0, 0.0, 0.0), Vector3::new(0.0, 3.9, 0.0));

    let exact = TravelTimeSolver::default()
        .adjustable_emitter(&satellite)
        .delay(&Vector3::zeros(), &arrival, EARTH_J2000)
        .unwrap();
    let coarse = TravelTimeSolver::builder()
        .convergence(Convergence::Tolerance(1e-9))
        .build()
        .adjustable_emitter(&satellite)
        .delay(&Vector3::zeros(), &arrival, EARTH_J2000)
        .unwrap();
    assert!(coarse.iterations <= exact.iterations);
    assert!((coarse.delay - exact.delay).abs() < 1e-9);

    // No iteration at all: the distance at the guessed emission
    let instantaneous = TravelTimeSolver::builder()
        .convergence(Convergence::Instantaneous)
        .build()
        .adjustable_emitter(&satellite)
        .delay(&Vector3::zeros(), &arrival, EARTH_J2000)
        .unwrap();
    assert_eq!(instantaneous.iterations, 1);
    assert!((instantaneous.delay - exact.delay).abs() < 1e-12);
}

#[rstest]
fn delay_partials(solver: TravelTimeSolver) {
    // Delay from a point moving along x towards a receiver at the origin, as a function of the
    // initial abscissa of the emitter
    let arrival = Instant::<Gradient>::at(test_epoch());
    let delay = |x: Gradient| {
        let emitter = TimeStampedPv::new(
            arrival.clone(),
            EARTH_J2000,
            PvCoordinates::from_pv(
                Vector3::new(x, Gradient::constant(2000.0), Gradient::constant(0.0)),
                Vector3::new(
                    Gradient::constant(-5.0),
                    Gradient::constant(0.0),
                    Gradient::constant(0.0),
                ),
            ),
        );
        solver
            .adjustable_emitter(&emitter)
            .delay(
                &Vector3::new(
                    Gradient::constant(0.0),
                    Gradient::constant(0.0),
                    Gradient::constant(0.0),
                ),
                &arrival,
                EARTH_J2000,
            )
            .unwrap()
            .delay
    };
    let lt = delay(Gradient::variable(1, 0, 5000.0));

    let h = 1e-2;
    let plus = delay(Gradient::constant(5000.0 + h)).real();
    let minus = delay(Gradient::constant(5000.0 - h)).real();
    let numeric = (plus - minus) / (2.0 * h);
    assert!(
        (lt.partial(0) - numeric).abs() < 1e-6 * numeric.abs(),
        "{} vs {numeric}",
        lt.partial(0)
    );
}
