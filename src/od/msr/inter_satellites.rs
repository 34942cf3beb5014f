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

use super::rangerate::radial_velocity;
use super::{Measurement, MeasurementType, ObservedMeasurement, Theoretical, TheoreticalEvaluation};
use crate::ad::{Derivation, Real};
use crate::cosmic::{SpacecraftState, TimeStampedPv, SPEED_OF_LIGHT_KM_S};
use crate::errors::MeasurementError;
use crate::od::observer::ObservableSatellite;
use crate::od::params::ParameterDriver;
use crate::od::signal::{satellite_receiver, CommonParameters, TravelTimeSolver};
use crate::time::Epoch;

/// Builds the observation of a signal received by `local` and emitted by `remote`.
fn inter_satellites_observation(
    epoch: Epoch,
    value: f64,
    sigma: f64,
    base_weight: f64,
    local: ObservableSatellite,
    remote: ObservableSatellite,
) -> Result<ObservedMeasurement, MeasurementError> {
    ObservedMeasurement::new(
        epoch,
        vec![value],
        vec![sigma],
        vec![base_weight],
        vec![local, remote],
    )
}

/// Downlink from the remote satellite (second one) to the local satellite (first one).
fn downlink<T: Real, D: Derivation<T>>(
    solver: &TravelTimeSolver,
    observed: &ObservedMeasurement,
    states: &[SpacecraftState],
    d: &D,
) -> Result<CommonParameters<T>, MeasurementError> {
    satellite_receiver(
        solver,
        &observed.satellites[0],
        &observed.satellites[1],
        observed.epoch,
        false,
        states,
        d,
    )
}

/// Range, in km, between two estimated satellites.
///
/// The one way range is corrected by the clock offsets of both satellites. The two way range is
/// half of the round trip local → remote → local, and only the local clock is involved.
#[derive(Clone, Debug, PartialEq)]
pub struct InterSatellitesRange {
    pub observed: ObservedMeasurement,
    pub two_way: bool,
    pub solver: TravelTimeSolver,
}

impl InterSatellitesRange {
    pub fn new(
        local: ObservableSatellite,
        remote: ObservableSatellite,
        two_way: bool,
        epoch: Epoch,
        range_km: f64,
        sigma_km: f64,
        base_weight: f64,
    ) -> Result<Self, MeasurementError> {
        Ok(Self {
            observed: inter_satellites_observation(
                epoch,
                range_km,
                sigma_km,
                base_weight,
                local,
                remote,
            )?,
            two_way,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for InterSatellitesRange {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        if self.two_way {
            MeasurementType::InterSatellitesTwoWayRange
        } else {
            MeasurementType::InterSatellitesRange
        }
    }

    fn satellite_count(&self) -> usize {
        2
    }

    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        self.observed.satellite_drivers()
    }
}

impl TheoreticalEvaluation for InterSatellitesRange {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        let common = downlink(&self.solver, &self.observed, states, d)?;

        let remote = &self.observed.satellites[1];
        let remote_state = remote.state(states)?;
        let remote_transit =
            remote_state.shifted_by(common.emission.seconds_since(remote_state.epoch).real());

        if self.two_way {
            let (tau_u, departure) = common.round_trip_uplink(&self.solver)?;
            let range = (common.tau_d.clone() + tau_u.clone()) * (0.5 * SPEED_OF_LIGHT_KM_S);
            let departure_instant = common.emission.shifted_by(-tau_u);
            Ok(Theoretical {
                values: vec![range],
                transit_states: vec![common.transit_state.clone(), remote_transit],
                participants: vec![
                    TimeStampedPv::new(departure_instant, common.state.frame, departure).to_real(),
                    common.emitter(),
                    common.receiver(),
                ],
            })
        } else {
            let range = (common.tau_d.clone() + common.receiver_clock.offset_s.clone()
                - common.emitter_clock.offset_s.clone())
                * SPEED_OF_LIGHT_KM_S;
            Ok(Theoretical {
                values: vec![range],
                transit_states: vec![common.transit_state.clone(), remote_transit],
                participants: vec![common.emitter(), common.receiver()],
            })
        }
    }
}

/// One way range rate, in km/s, between two estimated satellites, including the clock drifts.
#[derive(Clone, Debug, PartialEq)]
pub struct InterSatellitesOneWayRangeRate {
    pub observed: ObservedMeasurement,
    pub solver: TravelTimeSolver,
}

impl InterSatellitesOneWayRangeRate {
    pub fn new(
        local: ObservableSatellite,
        remote: ObservableSatellite,
        epoch: Epoch,
        range_rate_km_s: f64,
        sigma_km_s: f64,
        base_weight: f64,
    ) -> Result<Self, MeasurementError> {
        Ok(Self {
            observed: inter_satellites_observation(
                epoch,
                range_rate_km_s,
                sigma_km_s,
                base_weight,
                local,
                remote,
            )?,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for InterSatellitesOneWayRangeRate {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        MeasurementType::InterSatellitesRangeRate
    }

    fn satellite_count(&self) -> usize {
        2
    }

    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        self.observed.satellite_drivers()
    }
}

impl TheoreticalEvaluation for InterSatellitesOneWayRangeRate {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        let common = downlink(&self.solver, &self.observed, states, d)?;

        let remote = &self.observed.satellites[1];
        let remote_state = remote.state(states)?;
        let remote_transit =
            remote_state.shifted_by(common.emission.seconds_since(remote_state.epoch).real());

        let geometric = radial_velocity(&common.receiver_pv, &common.emitter_pv);
        let drift = (common.receiver_clock.rate.clone() - common.emitter_clock.rate.clone())
            * SPEED_OF_LIGHT_KM_S;

        Ok(Theoretical {
            values: vec![geometric + drift],
            transit_states: vec![common.transit_state.clone(), remote_transit],
            participants: vec![common.emitter(), common.receiver()],
        })
    }
}
