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
use super::tdoa::DifferenceOfArrival;
use super::{Measurement, MeasurementType, ObservedMeasurement, Theoretical, TheoreticalEvaluation};
use crate::ad::{Derivation, Real};
use crate::cosmic::{SpacecraftState, SPEED_OF_LIGHT_KM_S};
use crate::errors::{InvalidParameterSnafu, MeasurementError};
use crate::od::ground_station::GroundStation;
use crate::od::observer::{ObservableSatellite, Observer};
use crate::od::params::ParameterDriver;
use crate::od::signal::TravelTimeSolver;
use crate::time::Epoch;
use snafu::ensure;

/// Frequency difference of arrival, in Hz, of a carrier emitted by a satellite at two ground stations.
///
/// The geometry is the one of [Tdoa](super::Tdoa): both stations receive the same emission.
#[derive(Clone, Debug, PartialEq)]
pub struct Fdoa {
    pub observed: ObservedMeasurement,
    pub prime: GroundStation,
    pub secondary: GroundStation,
    /// Frequency of the emitted carrier, in Hz
    pub centre_frequency_hz: f64,
    pub solver: TravelTimeSolver,
}

impl Fdoa {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        prime: GroundStation,
        secondary: GroundStation,
        centre_frequency_hz: f64,
        epoch: Epoch,
        fdoa_hz: f64,
        sigma_hz: f64,
        base_weight: f64,
        satellite: ObservableSatellite,
    ) -> Result<Self, MeasurementError> {
        ensure!(
            centre_frequency_hz.is_finite() && centre_frequency_hz > 0.0,
            InvalidParameterSnafu {
                name: "centre_frequency_hz",
                reason: format!("must be strictly positive, got {centre_frequency_hz}"),
            }
        );
        Ok(Self {
            observed: ObservedMeasurement::scalar(
                epoch,
                fdoa_hz,
                sigma_hz,
                base_weight,
                satellite,
            )?,
            prime,
            secondary,
            centre_frequency_hz,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for Fdoa {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        MeasurementType::Fdoa
    }

    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.prime.parameter_drivers();
        drivers.extend(self.secondary.parameter_drivers());
        drivers.extend(self.observed.satellite_drivers());
        drivers
    }
}

impl TheoreticalEvaluation for Fdoa {
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

        let emitter = &geometry.prime.emitter_pv;
        let prime_rate = radial_velocity(&geometry.prime.receiver_pv, emitter);
        let secondary_rate = radial_velocity(&geometry.secondary_pv, emitter);
        let fdoa =
            (prime_rate - secondary_rate) * (-self.centre_frequency_hz / SPEED_OF_LIGHT_KM_S);

        Ok(geometry.theoretical(vec![fdoa]))
    }
}
