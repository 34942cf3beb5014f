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
use super::{assert_parameter_partial, assert_state_partials};
use crate::{state_above, test_epoch};
use nyx_measurements::cosmic::{BodyRotation, Ellipsoid, SpacecraftState};
use nyx_measurements::od::msr::*;
use nyx_measurements::od::{GroundStation, ObservableSatellite};
use rstest::*;
use nyx_measurements::time::TimeUnits;
use std::f64::consts::PI;

struct Scenario {
    madrid: GroundStation,
    toledo: GroundStation,
    states: Vec<SpacecraftState>,
}

#[fixture]
fn scenario() -> Scenario {
    let _ = pretty_env_logger::try_init();
    let madrid = GroundStation::dss65_madrid();
    let toledo = GroundStation::from_point(
        "Toledo".to_string(),
        39.86,
        2.0,
        0.5,
        Ellipsoid::wgs84(),
        BodyRotation::earth(),
    );
    let states = vec![
        state_above(&madrid, 200.0, 300.0, 600.0),
        state_above(&madrid, -150.0, 250.0, 700.0),
    ];
    Scenario {
        madrid,
        toledo,
        states,
    }
}

fn satellite() -> ObservableSatellite {
    ObservableSatellite::new(0)
}

#[rstest]
#[case::one_way(false)]
#[case::two_way(true)]
fn range(scenario: Scenario, #[case] two_way: bool) {
    let model = Range::new(
        scenario.madrid.clone(),
        two_way,
        test_epoch(),
        1000.0,
        1e-3,
        1.0,
        satellite(),
    )
    .unwrap();
    assert_state_partials(&model, &scenario.states);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.station.east_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.station.zenith_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| {
        vec![&mut m.station.eop.prime_meridian_offset]
    });
    assert_parameter_partial(&model, &scenario.states, |m| {
        vec![&mut m.station.eop.polar_offset_x]
    });
    if !two_way {
        assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.station.clock.offset]);
        assert_parameter_partial(&model, &scenario.states, |m| {
            vec![&mut m.observed.satellites[0].clock.offset]
        });
    }
}

#[rstest]
#[case::one_way(false)]
#[case::two_way(true)]
fn range_rate(scenario: Scenario, #[case] two_way: bool) {
    let model = RangeRate::new(
        scenario.madrid.clone(),
        two_way,
        test_epoch(),
        -1.0,
        1e-6,
        1.0,
        satellite(),
    )
    .unwrap();
    assert_state_partials(&model, &scenario.states);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.station.north_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| {
        vec![&mut m.station.eop.prime_meridian_offset]
    });
    if !two_way {
        assert_parameter_partial(&model, &scenario.states, |m| {
            vec![&mut m.observed.satellites[0].clock.drift]
        });
    }
}

#[rstest]
fn azimuth_elevation(scenario: Scenario) {
    let model = AngularAzEl::new(
        scenario.madrid.clone(),
        test_epoch(),
        PI,
        0.5,
        [1e-4, 1e-4],
        [1.0, 1.0],
        satellite(),
    )
    .unwrap();
    assert_state_partials(&model, &scenario.states);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.station.east_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| {
        vec![&mut m.station.eop.prime_meridian_offset]
    });
    assert_parameter_partial(&model, &scenario.states, |m| {
        vec![&mut m.station.eop.polar_offset_y]
    });
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.station.clock.offset]);
}

#[rstest]
fn earth_orientation_drifts(scenario: Scenario) {
    // Drifts counted from shortly before the measurement, so that a perturbation of one scale
    // stays in the linear regime
    let rotation = BodyRotation {
        reference_epoch: test_epoch() - 30.seconds(),
        ..BodyRotation::earth()
    };
    let madrid = GroundStation {
        rotation,
        ..scenario.madrid
    };
    let range = Range::new(
        madrid.clone(),
        false,
        test_epoch(),
        1000.0,
        1e-3,
        1.0,
        satellite(),
    )
    .unwrap();
    let angles = AngularAzEl::new(
        madrid,
        test_epoch(),
        PI,
        0.5,
        [1e-4, 1e-4],
        [1.0, 1.0],
        satellite(),
    )
    .unwrap();
    assert_parameter_partial(&range, &scenario.states, |m| {
        vec![&mut m.station.eop.prime_meridian_drift]
    });
    assert_parameter_partial(&range, &scenario.states, |m| {
        vec![&mut m.station.eop.polar_drift_x]
    });
    assert_parameter_partial(&angles, &scenario.states, |m| {
        vec![&mut m.station.eop.prime_meridian_drift]
    });
    assert_parameter_partial(&angles, &scenario.states, |m| {
        vec![&mut m.station.eop.polar_drift_y]
    });
    assert_state_partials(&angles, &scenario.states);
}

#[rstest]
#[case::inertial(RaDecReference::StateFrame)]
#[case::body_fixed(RaDecReference::BodyFixed)]
fn right_ascension_declination(scenario: Scenario, #[case] reference: RaDecReference) {
    let model = AngularRaDec::new(
        scenario.madrid.clone(),
        reference,
        test_epoch(),
        PI,
        0.5,
        [1e-4, 1e-4],
        [1.0, 1.0],
        satellite(),
    )
    .unwrap();
    assert_state_partials(&model, &scenario.states);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.station.zenith_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| {
        vec![&mut m.station.eop.prime_meridian_offset]
    });
}

#[rstest]
fn tdoa(scenario: Scenario) {
    let model = Tdoa::new(
        scenario.madrid.clone(),
        scenario.toledo.clone(),
        test_epoch(),
        0.0,
        1e-9,
        1.0,
        satellite(),
    )
    .unwrap();
    assert_state_partials(&model, &scenario.states);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.prime.clock.offset]);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.secondary.clock.offset]);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.prime.east_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.secondary.zenith_offset]);
    // Both stations see the same Earth
    assert_parameter_partial(&model, &scenario.states, |m| {
        vec![
            &mut m.prime.eop.prime_meridian_offset,
            &mut m.secondary.eop.prime_meridian_offset,
        ]
    });
}

#[rstest]
fn fdoa(scenario: Scenario) {
    let model = Fdoa::new(
        scenario.madrid.clone(),
        scenario.toledo.clone(),
        2.2e9,
        test_epoch(),
        0.0,
        1.0,
        1.0,
        satellite(),
    )
    .unwrap();
    assert_state_partials(&model, &scenario.states);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.prime.north_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.secondary.east_offset]);
}

#[rstest]
fn bistatic(scenario: Scenario) {
    let range = BistaticRange::new(
        scenario.toledo.clone(),
        scenario.madrid.clone(),
        test_epoch(),
        1500.0,
        1e-3,
        1.0,
        satellite(),
    )
    .unwrap();
    assert_state_partials(&range, &scenario.states);
    assert_parameter_partial(&range, &scenario.states, |m| vec![&mut m.emitter.zenith_offset]);
    assert_parameter_partial(&range, &scenario.states, |m| vec![&mut m.receiver.clock.offset]);

    let range_rate = BistaticRangeRate::new(
        scenario.toledo.clone(),
        scenario.madrid.clone(),
        test_epoch(),
        0.0,
        1e-6,
        1.0,
        satellite(),
    )
    .unwrap();
    assert_state_partials(&range_rate, &scenario.states);
    assert_parameter_partial(&range_rate, &scenario.states, |m| {
        vec![&mut m.emitter.east_offset]
    });
}

#[rstest]
fn turn_around(scenario: Scenario) {
    let model = TurnAroundRange::new(
        scenario.madrid.clone(),
        scenario.toledo.clone(),
        test_epoch(),
        1500.0,
        1e-3,
        1.0,
        satellite(),
    )
    .unwrap();
    assert_state_partials(&model, &scenario.states);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.primary.zenith_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.secondary.north_offset]);
    assert_parameter_partial(&model, &scenario.states, |m| vec![&mut m.primary.clock.offset]);
}

#[rstest]
#[case::one_way(false)]
#[case::two_way(true)]
fn inter_satellites_range(scenario: Scenario, #[case] two_way: bool) {
    let model = InterSatellitesRange::new(
        ObservableSatellite::new(0),
        ObservableSatellite::new(1),
        two_way,
        test_epoch(),
        400.0,
        1e-3,
        1.0,
    )
    .unwrap();
    let estimated = model.evaluate(0, 0, &scenario.states).unwrap();
    // Partials flow into both satellites
    assert!(estimated.state_derivatives[0].norm() > 0.5);
    assert!(estimated.state_derivatives[1].norm() > 0.5);
    assert_state_partials(&model, &scenario.states);
    if !two_way {
        assert_parameter_partial(&model, &scenario.states, |m| {
            vec![&mut m.observed.satellites[1].clock.offset]
        });
    }
}

#[rstest]
fn inter_satellites_range_rate(scenario: Scenario) {
    let model = InterSatellitesOneWayRangeRate::new(
        ObservableSatellite::new(0),
        ObservableSatellite::new(1),
        test_epoch(),
        0.1,
        1e-6,
        1.0,
    )
    .unwrap();
    assert_state_partials(&model, &scenario.states);
    assert_parameter_partial(&model, &scenario.states, |m| {
        vec![&mut m.observed.satellites[1].clock.drift]
    });
}
