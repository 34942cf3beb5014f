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

use super::{Measurement, MeasurementType, ObservedMeasurement, Theoretical, TheoreticalEvaluation};
use crate::ad::linalg::{dot, normalize, sub};
use crate::ad::{Derivation, Real};
use crate::cosmic::{PvCoordinates, SpacecraftState, TimeStampedPv, SPEED_OF_LIGHT_KM_S};
use crate::errors::MeasurementError;
use crate::od::ground_station::GroundStation;
use crate::od::observer::{ObservableSatellite, Observer};
use crate::od::params::ParameterDriver;
use crate::od::signal::{observer_receiver, TravelTimeSolver};
use crate::time::Epoch;

/// Projection of the relative velocity of `a` with respect to `b` on the line of sight from `b` to `a`.
pub(crate) fn radial_velocity<T: Real>(a: &PvCoordinates<T>, b: &PvCoordinates<T>) -> T {
    let line_of_sight = normalize(&sub(&a.position, &b.position));
    dot(&sub(&a.velocity, &b.velocity), &line_of_sight)
}

/// Range rate between a ground station and a satellite, in km/s.
///
/// The one way range rate includes the difference of the clock drifts of the receiver and of the
/// emitter. The two way range rate is the mean of the downlink and uplink range rates.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeRate {
    pub observed: ObservedMeasurement,
    pub station: GroundStation,
    pub two_way: bool,
    pub solver: TravelTimeSolver,
}

impl RangeRate {
    pub fn new(
        station: GroundStation,
        two_way: bool,
        epoch: Epoch,
        range_rate_km_s: f64,
        sigma_km_s: f64,
        base_weight: f64,
        satellite: ObservableSatellite,
    ) -> Result<Self, MeasurementError> {
        Ok(Self {
            observed: ObservedMeasurement::scalar(
                epoch,
                range_rate_km_s,
                sigma_km_s,
                base_weight,
                satellite,
            )?,
            station,
            two_way,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for RangeRate {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        if self.two_way {
            MeasurementType::TwoWayRangeRate
        } else {
            MeasurementType::RangeRate
        }
    }

    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.station.parameter_drivers();
        drivers.extend(self.observed.satellite_drivers());
        drivers
    }
}

impl TheoreticalEvaluation for RangeRate {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        let satellite = &self.observed.satellites[0];
        let common = observer_receiver(
            &self.solver,
            &self.station,
            satellite,
            self.observed.epoch,
            false,
            states,
            d,
        )?;

        let downlink = radial_velocity(&common.receiver_pv, &common.emitter_pv);

        if self.two_way {
            let (tau_u, departure) = common.round_trip_uplink(&self.solver)?;
            let uplink = radial_velocity(&departure, &common.emitter_pv);
            let departure_instant = common.emission.shifted_by(-tau_u);
            Ok(Theoretical {
                values: vec![(downlink + uplink) * 0.5],
                transit_states: vec![common.transit_state.clone()],
                participants: vec![
                    TimeStampedPv::new(departure_instant, common.state.frame, departure).to_real(),
                    common.emitter(),
                    common.receiver(),
                ],
            })
        } else {
            let drift = (common.receiver_clock.rate.clone() - common.emitter_clock.rate.clone())
                * SPEED_OF_LIGHT_KM_S;
            Ok(Theoretical {
                values: vec![downlink + drift],
                transit_states: vec![common.transit_state.clone()],
                participants: vec![common.emitter(), common.receiver()],
            })
        }
    }
}
