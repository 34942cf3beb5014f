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
use crate::ad::{Derivation, Instant, Real};
use crate::cosmic::{PvCoordinates, SpacecraftState, TimeStampedPv};
use crate::errors::MeasurementError;
use crate::od::ground_station::GroundStation;
use crate::od::observer::{ObservableSatellite, Observer, ObserverProvider};
use crate::od::params::ParameterDriver;
use crate::od::signal::{observer_receiver, CommonParameters, TravelTimeSolver};
use crate::time::Epoch;

/// Geometry of a signal emitted by a satellite and received by two stations.
pub(crate) struct DifferenceOfArrival<T: Real> {
    /// The downlink to the prime station, which time tags the measurement
    pub prime: CommonParameters<T>,
    /// Delay between the emission and the reception at the secondary station
    pub tau_secondary: T,
    pub secondary_reception: Instant<T>,
    pub secondary_pv: PvCoordinates<T>,
}

impl<T: Real> DifferenceOfArrival<T> {
    /// Solves both downlinks of the signal received by `prime` at `epoch`, on its own clock.
    pub(crate) fn solve<D: Derivation<T>>(
        solver: &TravelTimeSolver,
        prime: &GroundStation,
        secondary: &GroundStation,
        observed: &ObservedMeasurement,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Self, MeasurementError> {
        let common = observer_receiver(
            solver,
            prime,
            &observed.satellites[0],
            observed.epoch,
            true,
            states,
            d,
        )?;
        let frame = common.state.frame;

        let provider = ObserverProvider::new(secondary, states, d);
        let tau_secondary = solver
            .adjustable_receiver(&provider)
            .delay(&common.emitter_pv.position, &common.emission, frame)?
            .delay;
        let secondary_reception = common.emission.shifted_by(tau_secondary.clone());
        let secondary_pv = secondary.pv_at(&secondary_reception, frame, states, d)?;

        Ok(Self {
            prime: common,
            tau_secondary,
            secondary_reception,
            secondary_pv,
        })
    }

    pub(crate) fn theoretical(self, values: Vec<T>) -> Theoretical<T> {
        let frame = self.prime.state.frame;
        Theoretical {
            values,
            transit_states: vec![self.prime.transit_state.clone()],
            participants: vec![
                self.prime.emitter(),
                self.prime.receiver(),
                TimeStampedPv::new(self.secondary_reception, frame, self.secondary_pv).to_real(),
            ],
        }
    }
}

/// Time difference of arrival, in seconds, of a signal emitted by a satellite at two ground stations.
///
/// The measurement is time tagged by the prime station, and is positive when the signal reaches the
/// secondary station first. Each reception is corrected for the clock offset of its station.
#[derive(Clone, Debug, PartialEq)]
pub struct Tdoa {
    pub observed: ObservedMeasurement,
    pub prime: GroundStation,
    pub secondary: GroundStation,
    pub solver: TravelTimeSolver,
}

impl Tdoa {
    pub fn new(
        prime: GroundStation,
        secondary: GroundStation,
        epoch: Epoch,
        tdoa_s: f64,
        sigma_s: f64,
        base_weight: f64,
        satellite: ObservableSatellite,
    ) -> Result<Self, MeasurementError> {
        Ok(Self {
            observed: ObservedMeasurement::scalar(epoch, tdoa_s, sigma_s, base_weight, satellite)?,
            prime,
            secondary,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for Tdoa {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        MeasurementType::Tdoa
    }

    /// Drivers of the prime station, then of the secondary station, then of the satellite.
    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.prime.parameter_drivers();
        drivers.extend(self.secondary.parameter_drivers());
        drivers.extend(self.observed.satellite_drivers());
        drivers
    }
}

impl TheoreticalEvaluation for Tdoa {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        let geometry = DifferenceOfArrival::solve(
            &self.solver,
            &self.prime,
            &self.secondary,
            &self.observed,
            states,
            d,
        )?;

        let prime_clock = geometry.prime.receiver_clock.offset_s.clone();
        let secondary_clock = self
            .secondary
            .clock_offset_at(&geometry.secondary_reception, d)
            .offset_s;
        let tdoa = (geometry.prime.tau_d.clone() + prime_clock)
            - (geometry.tau_secondary.clone() + secondary_clock);

        Ok(geometry.theoretical(vec![tdoa]))
    }
}
