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
use crate::{state_above, static_state, static_station, test_epoch};
use anise::constants::frames::MOON_J2000;
use approx::assert_relative_eq;
use nyx_measurements::ad::NoDerivatives;
use nyx_measurements::cosmic::{SpacecraftState, SPEED_OF_LIGHT_KM_S};
use nyx_measurements::linalg::Vector3;
use nyx_measurements::od::clock::QuadraticClockModel;
use nyx_measurements::od::msr::*;
use nyx_measurements::od::signal::{observer_receiver, TravelTimeSolver};
use nyx_measurements::od::{GroundStation, ObservableSatellite};
use nyx_measurements::time::{Epoch, TimeUnits};
use nyx_measurements::MeasurementError;
use rstest::*;
use std::f64::consts::{PI, TAU};

#[fixture]
fn station() -> GroundStation {
    let _ = pretty_env_logger::try_init();
    static_station("Static", 0.0)
}

fn satellite() -> ObservableSatellite {
    ObservableSatellite::new(0)
}

fn range(station: &GroundStation, two_way: bool) -> Range {
    Range::new(
        station.clone(),
        two_way,
        test_epoch(),
        500.0,
        1e-3,
        1.0,
        satellite(),
    )
    .unwrap()
}

#[rstest]
fn static_one_way_range(station: GroundStation) {
    let states = [static_state(7000.0, 0.0, 500.0)];
    let estimated = range(&station, false)
        .evaluate_without_derivatives(3, 7, &states)
        .unwrap();
    assert_relative_eq!(estimated.estimated[0], 500.0, max_relative = 1e-14);
    assert_eq!(estimated.iteration, 3);
    assert_eq!(estimated.count, 7);
    assert_eq!(estimated.kind, MeasurementType::Range);
    assert_eq!(estimated.status, EstimationStatus::Processed);
    assert_eq!(estimated.transit_states.len(), 1);
    assert_eq!(estimated.participants.len(), 2);
    assert!(estimated.residuals()[0].abs() < 1e-10);

    // The reflection point is the satellite, the reception point is the station
    assert_eq!(
        estimated.participants[0].pv.position,
        Vector3::new(7000.0, 0.0, 500.0)
    );
    assert_eq!(
        estimated.participants[1].pv.position,
        Vector3::new(7000.0, 0.0, 0.0)
    );

    // A late station clock shows a longer range
    let late = range(&station.clone().with_clock_offset(1e-3), false)
        .evaluate_without_derivatives(0, 0, &states)
        .unwrap();
    assert_relative_eq!(
        late.estimated[0],
        500.0 + 1e-3 * SPEED_OF_LIGHT_KM_S,
        max_relative = 1e-14
    );
}

#[rstest]
#[case(0.0)]
#[case(1e-3)]
#[case(-0.25)]
fn static_two_way_range(station: GroundStation, #[case] clock_offset_s: f64) {
    let station = station.with_clock_offset(clock_offset_s);
    let states = [static_state(7000.0, 0.0, 500.0)];
    let estimated = range(&station, true)
        .evaluate_without_derivatives(0, 0, &states)
        .unwrap();
    assert_relative_eq!(estimated.estimated[0], 500.0, max_relative = 1e-14);
    assert_eq!(estimated.kind, MeasurementType::TwoWayRange);
    assert_eq!(estimated.participants.len(), 3);

    // The light travels twice the distance
    let solver = TravelTimeSolver::default();
    let common = observer_receiver(
        &solver,
        &station,
        &satellite(),
        test_epoch(),
        false,
        &states,
        &NoDerivatives,
    )
    .unwrap();
    let (tau_u, _) = common.round_trip_uplink(&solver).unwrap();
    assert_relative_eq!(
        (common.tau_d + tau_u) * SPEED_OF_LIGHT_KM_S,
        1000.0,
        max_relative = 1e-14
    );
}

#[rstest]
fn static_range_rate(station: GroundStation) {
    let states = [static_state(7000.0, 0.0, 500.0)];
    for two_way in [false, true] {
        let model = RangeRate::new(
            station.clone(),
            two_way,
            test_epoch(),
            0.0,
            1e-6,
            1.0,
            satellite(),
        )
        .unwrap();
        let estimated = model.evaluate_without_derivatives(0, 0, &states).unwrap();
        assert_eq!(estimated.estimated[0], 0.0);
    }

    // A drifting station clock shows up in the one way range rate
    let drifting = station.with_clock(
        QuadraticClockModel::for_station("Static", test_epoch()).with_coefficients(0.0, 1e-9, 0.0),
    );
    let model = RangeRate::new(drifting, false, test_epoch(), 0.0, 1e-6, 1.0, satellite()).unwrap();
    let estimated = model.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert_relative_eq!(
        estimated.estimated[0],
        1e-9 * SPEED_OF_LIGHT_KM_S,
        max_relative = 1e-12
    );
}

#[rstest]
fn range_rate_is_range_derivative() {
    let _ = pretty_env_logger::try_init();
    let station = GroundStation::dss65_madrid();
    let states = [state_above(&station, 0.0, -800.0, 400.0)];
    let model = RangeRate::new(station, false, test_epoch(), 0.0, 1e-6, 1.0, satellite()).unwrap();
    let now = model.evaluate_without_derivatives(0, 0, &states).unwrap();

    let range_at = |epoch: Epoch| {
        Range::new(model.station.clone(), false, epoch, 0.0, 1.0, 1.0, satellite())
            .unwrap()
            .evaluate_without_derivatives(0, 0, &states)
            .unwrap()
            .estimated[0]
    };
    let numeric =
        (range_at(test_epoch() + 0.1.seconds()) - range_at(test_epoch() - 0.1.seconds())) / 0.2;
    assert_relative_eq!(now.estimated[0], numeric, max_relative = 1e-4);
}

#[rstest]
fn static_angles(station: GroundStation) {
    let states = [static_state(7500.0, 300.0, 400.0)];
    let los = Vector3::<f64>::new(500.0, 300.0, 400.0);

    // East is +Y, north is +Z, zenith is +X for a station on the equator at zero longitude
    let azel = AngularAzEl::new(
        station.clone(),
        test_epoch(),
        PI,
        0.5,
        [1e-4, 1e-4],
        [1.0, 1.0],
        satellite(),
    )
    .unwrap();
    let estimated = azel.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert_relative_eq!(estimated.estimated[0], 300.0_f64.atan2(400.0), epsilon = 1e-12);
    assert_relative_eq!(estimated.estimated[1], (500.0 / los.norm()).asin(), epsilon = 1e-12);

    for reference in [RaDecReference::StateFrame, RaDecReference::BodyFixed] {
        let radec = AngularRaDec::new(
            station.clone(),
            reference,
            test_epoch(),
            PI,
            0.5,
            [1e-4, 1e-4],
            [1.0, 1.0],
            satellite(),
        )
        .unwrap();
        let estimated = radec.evaluate_without_derivatives(0, 0, &states).unwrap();
        assert_relative_eq!(estimated.estimated[0], 300.0_f64.atan2(500.0), epsilon = 1e-12);
        assert_relative_eq!(estimated.estimated[1], (400.0 / los.norm()).asin(), epsilon = 1e-12);
    }
}

#[rstest]
fn azimuth_wrap(station: GroundStation) {
    let azimuth_of = |phi: f64, observed: f64| {
        let states = [static_state(7500.0, 100.0 * phi.sin(), 100.0 * phi.cos())];
        AngularAzEl::new(
            station.clone(),
            test_epoch(),
            observed,
            0.5,
            [1e-4, 1e-4],
            [1.0, 1.0],
            satellite(),
        )
        .unwrap()
        .evaluate_without_derivatives(0, 0, &states)
        .unwrap()
        .estimated[0]
    };

    // Wrapped in [0, 2π) around the default center
    let first = azimuth_of(-0.5, PI);
    assert_relative_eq!(first, TAU - 0.5, epsilon = 1e-12);
    // Wrapping an already wrapped angle does not change it
    assert_eq!(azimuth_of(-0.5, first), first);

    // Tracking through north: each observation is close to the previous one
    let mut previous = first;
    for step in 1..=20 {
        let phi = -0.5 + 0.05 * f64::from(step);
        let azimuth = azimuth_of(phi, previous);
        assert!((azimuth - previous).abs() < PI, "jump from {previous} to {azimuth}");
        assert_relative_eq!(azimuth, phi + TAU, epsilon = 1e-12);
        previous = azimuth;
    }
}

#[rstest]
fn equidistant_tdoa_fdoa() {
    let _ = pretty_env_logger::try_init();
    let prime = static_station("East", 10.0);
    let secondary = static_station("West", -10.0);
    let states = [static_state(7500.0, 0.0, 0.0)];

    let tdoa = Tdoa::new(
        prime.clone(),
        secondary.clone(),
        test_epoch(),
        0.0,
        1e-9,
        1.0,
        satellite(),
    )
    .unwrap();
    let estimated = tdoa.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert!(estimated.estimated[0].abs() < 1e-15, "{}", estimated.estimated[0]);
    assert_eq!(estimated.participants.len(), 3);

    // The clock offsets add to each delay
    let late = Tdoa::new(
        prime.clone().with_clock_offset(2e-6),
        secondary.clone().with_clock_offset(5e-6),
        test_epoch(),
        0.0,
        1e-9,
        1.0,
        satellite(),
    )
    .unwrap();
    let estimated = late.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert_relative_eq!(estimated.estimated[0], -3e-6, epsilon = 1e-15);

    let fdoa =
        Fdoa::new(prime, secondary, 2.2e9, test_epoch(), 0.0, 1.0, 1.0, satellite()).unwrap();
    let estimated = fdoa.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert_eq!(estimated.estimated[0], 0.0);
}

#[rstest]
fn static_multi_leg() {
    let _ = pretty_env_logger::try_init();
    let first = static_station("First", 0.0);
    let second = static_station("Second", 10.0);
    let states = [static_state(7500.0, 0.0, 500.0)];
    let to_first = (first_position() - states[0].position_km).norm();
    let to_second = (second_position() - states[0].position_km).norm();

    let bistatic = BistaticRange::new(
        second.clone(),
        first.clone(),
        test_epoch(),
        0.0,
        1e-3,
        1.0,
        satellite(),
    )
    .unwrap();
    let estimated = bistatic.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert_relative_eq!(estimated.estimated[0], to_first + to_second, max_relative = 1e-13);
    assert_eq!(estimated.participants.len(), 3);

    let bistatic_rate = BistaticRangeRate::new(
        second.clone(),
        first.clone(),
        test_epoch(),
        0.0,
        1e-6,
        1.0,
        satellite(),
    )
    .unwrap();
    let estimated = bistatic_rate.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert_eq!(estimated.estimated[0], 0.0);

    let turn_around = TurnAroundRange::new(
        first,
        second,
        test_epoch(),
        0.0,
        1e-3,
        1.0,
        satellite(),
    )
    .unwrap();
    let estimated = turn_around.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert_relative_eq!(estimated.estimated[0], to_first + to_second, max_relative = 1e-13);
    assert_eq!(estimated.transit_states.len(), 2);
    assert_eq!(estimated.participants.len(), 5);
}

fn first_position() -> Vector3<f64> {
    Vector3::new(7000.0, 0.0, 0.0)
}

fn second_position() -> Vector3<f64> {
    let lon = 10.0_f64.to_radians();
    Vector3::new(7000.0 * lon.cos(), 7000.0 * lon.sin(), 0.0)
}

#[rstest]
fn static_inter_satellites() {
    let _ = pretty_env_logger::try_init();
    let states = [
        static_state(7000.0, 0.0, 0.0),
        static_state(7000.0, 120.0, -50.0),
    ];
    for two_way in [false, true] {
        let model = InterSatellitesRange::new(
            ObservableSatellite::new(0),
            ObservableSatellite::new(1),
            two_way,
            test_epoch(),
            130.0,
            1e-3,
            1.0,
        )
        .unwrap();
        assert_eq!(model.satellite_count(), 2);
        let estimated = model.evaluate_without_derivatives(0, 0, &states).unwrap();
        assert_relative_eq!(estimated.estimated[0], 130.0, max_relative = 1e-14);
        assert_eq!(estimated.transit_states.len(), 2);

        // Both satellites are needed
        assert_eq!(
            model.evaluate_without_derivatives(0, 0, &states[..1]),
            Err(MeasurementError::StateCount {
                kind: model.measurement_type(),
                need: 2,
                got: 1
            })
        );
    }

    let rate = InterSatellitesOneWayRangeRate::new(
        ObservableSatellite::new(0),
        ObservableSatellite::new(1),
        test_epoch(),
        0.0,
        1e-6,
        1.0,
    )
    .unwrap();
    let estimated = rate.evaluate_without_derivatives(0, 0, &states).unwrap();
    assert_eq!(estimated.estimated[0], 0.0);
}

#[rstest]
fn rejected_and_errors(station: GroundStation) {
    let states = [static_state(7000.0, 0.0, 500.0)];

    let mut disabled = range(&station, false);
    disabled.observed.enabled = false;
    let estimated = disabled.evaluate(0, 0, &states).unwrap();
    assert_eq!(estimated.base.status, EstimationStatus::Rejected);
    assert!(!estimated.base.is_processed());
    // Nothing selected, so no parameter partials
    assert!(estimated.parameter_derivatives.is_empty());

    // States in a frame unknown to the station
    let mut lunar = states[0].clone();
    lunar.frame = MOON_J2000;
    let err = range(&station, false)
        .evaluate_without_derivatives(0, 0, &[lunar])
        .unwrap_err();
    assert!(matches!(err, MeasurementError::FrameMismatch { .. }), "{err}");

    // Satellite missing from the states
    let far = Range::new(
        station.clone(),
        false,
        test_epoch(),
        500.0,
        1e-3,
        1.0,
        ObservableSatellite::new(2),
    )
    .unwrap();
    assert!(matches!(
        far.evaluate(0, 0, &states),
        Err(MeasurementError::StateCount { need: 3, got: 1, .. })
    ));

    // Malformed observations
    assert!(
        ObservedMeasurement::new(test_epoch(), vec![1.0], vec![], vec![1.0], vec![satellite()])
            .is_err()
    );
    let negative_sigma =
        ObservedMeasurement::new(test_epoch(), vec![1.0], vec![-1.0], vec![1.0], vec![satellite()]);
    assert!(negative_sigma.is_err());
    assert!(Fdoa::new(
        station.clone(),
        station,
        -1.0,
        test_epoch(),
        0.0,
        1.0,
        1.0,
        satellite()
    )
    .is_err());
}

#[rstest]
fn batch_matches_individual_evaluations() {
    let _ = pretty_env_logger::try_init();
    let madrid = GroundStation::dss65_madrid();
    let canberra = GroundStation::dss34_canberra();
    let states: Vec<SpacecraftState> = vec![
        state_above(&madrid, 100.0, 200.0, 800.0),
        state_above(&madrid, -300.0, 100.0, 900.0),
    ];

    let mut selected = madrid.clone();
    selected.clock.offset.set_selected(true);
    selected.eop.polar_offset_x.set_selected(true);

    let models: Vec<Box<dyn MeasurementModel>> = vec![
        Box::new(
            Range::new(selected.clone(), false, test_epoch(), 0.0, 1.0, 1.0, satellite()).unwrap(),
        ),
        Box::new(
            RangeRate::new(madrid.clone(), true, test_epoch(), 0.0, 1.0, 1.0, satellite()).unwrap(),
        ),
        Box::new(
            AngularAzEl::new(selected, test_epoch(), PI, 0.5, [1.0, 1.0], [1.0, 1.0], satellite())
                .unwrap(),
        ),
        Box::new(Tdoa::new(madrid, canberra, test_epoch(), 0.0, 1.0, 1.0, satellite()).unwrap()),
        Box::new(
            InterSatellitesRange::new(
                ObservableSatellite::new(1),
                ObservableSatellite::new(0),
                false,
                test_epoch(),
                0.0,
                1.0,
                1.0,
            )
            .unwrap(),
        ),
    ];

    let batch = evaluate_batch(&models, 2, 5, &states);
    assert_eq!(batch.len(), models.len());
    for (model, result) in models.iter().zip(batch) {
        let single = model.evaluate(2, 5, &states).unwrap();
        let result = result.unwrap();
        assert_eq!(result, single);
        assert_eq!(result.state_derivatives.len(), 2);
        assert_eq!(result.state_derivatives[0].nrows(), model.observed().dimension());
    }

    // Each model has its own parameter axis
    let range = models[0].evaluate(0, 0, &states).unwrap();
    assert_eq!(
        range.parameter_derivatives.keys().collect::<Vec<_>>(),
        vec!["Madrid-clock", "polar-offset-X"]
    );
    assert!(models[1].evaluate(0, 0, &states).unwrap().parameter_derivatives.is_empty());
}
