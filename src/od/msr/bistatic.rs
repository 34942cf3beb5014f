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
use crate::ad::{Derivation, Instant, Real};
use crate::cosmic::{PvCoordinates, SpacecraftState, TimeStampedPv, SPEED_OF_LIGHT_KM_S};
use crate::errors::MeasurementError;
use crate::od::ground_station::GroundStation;
use crate::od::observer::{ObservableSatellite, Observer, ObserverProvider};
use crate::od::params::ParameterDriver;
use crate::od::signal::{observer_receiver, CommonParameters, TravelTimeSolver};
use crate::time::Epoch;

/// The three points of a bistatic signal path.
struct BistaticPath<T: Real> {
    /// Downlink from the satellite to the receiving station
    downlink: CommonParameters<T>,
    /// Delay between the departure from the emitting station and the reflection on the satellite
    tau_u: T,
    departure: Instant<T>,
    emitter_pv: PvCoordinates<T>,
}

impl<T: Real> BistaticPath<T> {
    /// Solves the downlink first (its reception time tags the measurement), then the uplink
    /// towards the reflection point it found.
    fn solve<D: Derivation<T>>(
        solver: &TravelTimeSolver,
        emitter: &GroundStation,
        receiver: &GroundStation,
        observed: &ObservedMeasurement,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Self, MeasurementError> {
        let downlink = observer_receiver(
            solver,
            receiver,
            &observed.satellites[0],
            observed.epoch,
            false,
            states,
            d,
        )?;
        let frame = downlink.state.frame;

        let provider = ObserverProvider::new(emitter, states, d);
        let tau_u = solver
            .adjustable_emitter(&provider)
            .delay(&downlink.emitter_pv.position, &downlink.emission, frame)?
            .delay;
        let departure = downlink.emission.shifted_by(-tau_u.clone());
        let emitter_pv = emitter.pv_at(&departure, frame, states, d)?;

        Ok(Self {
            downlink,
            tau_u,
            departure,
            emitter_pv,
        })
    }

    fn theoretical(self, values: Vec<T>) -> Theoretical<T> {
        let frame = self.downlink.state.frame;
        Theoretical {
            values,
            transit_states: vec![self.downlink.transit_state.clone()],
            participants: vec![
                TimeStampedPv::new(self.departure, frame, self.emitter_pv).to_real(),
                self.downlink.emitter(),
                self.downlink.receiver(),
            ],
        }
    }
}

/// Length, in km, of the path of a signal emitted by a station, reflected by a satellite and
/// received by another station.
#[derive(Clone, Debug, PartialEq)]
pub struct BistaticRange {
    pub observed: ObservedMeasurement,
    pub emitter: GroundStation,
    pub receiver: GroundStation,
    pub solver: TravelTimeSolver,
}

impl BistaticRange {
    pub fn new(
        emitter: GroundStation,
        receiver: GroundStation,
        epoch: Epoch,
        range_km: f64,
        sigma_km: f64,
        base_weight: f64,
        satellite: ObservableSatellite,
    ) -> Result<Self, MeasurementError> {
        Ok(Self {
            observed: ObservedMeasurement::scalar(
                epoch,
                range_km,
                sigma_km,
                base_weight,
                satellite,
            )?,
            emitter,
            receiver,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for BistaticRange {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        MeasurementType::BistaticRange
    }

    /// Drivers of the emitting station, then of the receiving station, then of the satellite.
    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.emitter.parameter_drivers();
        drivers.extend(self.receiver.parameter_drivers());
        drivers.extend(self.observed.satellite_drivers());
        drivers
    }
}

impl TheoreticalEvaluation for BistaticRange {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        let path = BistaticPath::solve(
            &self.solver,
            &self.emitter,
            &self.receiver,
            &self.observed,
            states,
            d,
        )?;
        let range = (path.downlink.tau_d.clone() + path.tau_u.clone()) * SPEED_OF_LIGHT_KM_S;
        Ok(path.theoretical(vec![range]))
    }
}

/// Rate of change, in km/s, of the path length of a bistatic signal.
///
/// Each leg contributes the projection of its relative velocity on its own line of sight.
#[derive(Clone, Debug, PartialEq)]
pub struct BistaticRangeRate {
    pub observed: ObservedMeasurement,
    pub emitter: GroundStation,
    pub receiver: GroundStation,
    pub solver: TravelTimeSolver,
}

impl BistaticRangeRate {
    pub fn new(
        emitter: GroundStation,
        receiver: GroundStation,
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
            emitter,
            receiver,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for BistaticRangeRate {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        MeasurementType::BistaticRangeRate
    }

    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.emitter.parameter_drivers();
        drivers.extend(self.receiver.parameter_drivers());
        drivers.extend(self.observed.satellite_drivers());
        drivers
    }
}

impl TheoreticalEvaluation for BistaticRangeRate {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        let path = BistaticPath::solve(
            &self.solver,
            &self.emitter,
            &self.receiver,
            &self.observed,
            states,
            d,
        )?;
        let downlink = radial_velocity(&path.downlink.receiver_pv, &path.downlink.emitter_pv);
        let uplink = radial_velocity(&path.downlink.emitter_pv, &path.emitter_pv);
        Ok(path.theoretical(vec![downlink + uplink]))
    }
}
