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
use crate::ad::{Derivation, Real};
use crate::cosmic::{SpacecraftState, TimeStampedPv, SPEED_OF_LIGHT_KM_S};
use crate::errors::MeasurementError;
use crate::od::ground_station::GroundStation;
use crate::od::observer::{ObservableSatellite, Observer, ObserverProvider};
use crate::od::params::ParameterDriver;
use crate::od::signal::{observer_receiver, TravelTimeSolver};
use crate::time::Epoch;

/// Turn-around range, in km, of a signal going primary → satellite → secondary → satellite → primary.
///
/// The value is half the total path length. The legs are solved backwards from the reception at
/// the primary station, each leg providing the date and position the previous one must reach.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnAroundRange {
    pub observed: ObservedMeasurement,
    pub primary: GroundStation,
    pub secondary: GroundStation,
    pub solver: TravelTimeSolver,
}

impl TurnAroundRange {
    pub fn new(
        primary: GroundStation,
        secondary: GroundStation,
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
            primary,
            secondary,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for TurnAroundRange {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        MeasurementType::TurnAroundRange
    }

    /// Drivers of the primary station, then of the secondary station, then of the satellite.
    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.primary.parameter_drivers();
        drivers.extend(self.secondary.parameter_drivers());
        drivers.extend(self.observed.satellite_drivers());
        drivers
    }
}

impl TheoreticalEvaluation for TurnAroundRange {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        // Last leg: satellite to primary, received at the measurement date
        let common = observer_receiver(
            &self.solver,
            &self.primary,
            &self.observed.satellites[0],
            self.observed.epoch,
            false,
            states,
            d,
        )?;
        let frame = common.state.frame;
        let tau_leg2_down = common.tau_d.clone();
        let transit2 = common.emission.clone();
        let satellite_at_transit2 =
            TimeStampedPv::new(transit2.clone(), frame, common.emitter_pv.clone());

        // Secondary to satellite, reaching it at the second transit
        let secondary = ObserverProvider::new(&self.secondary, states, d);
        let tau_leg2_up = self
            .solver
            .adjustable_emitter(&secondary)
            .delay(&common.emitter_pv.position, &transit2, frame)?
            .delay;
        let turn_around = transit2.shifted_by(-tau_leg2_up.clone());
        let secondary_pv = self.secondary.pv_at(&turn_around, frame, states, d)?;

        // Satellite to secondary, the emission being searched from the second transit
        let tau_leg1_down = self
            .solver
            .adjustable_emitter(&satellite_at_transit2)
            .delay_with_guess(&transit2, &secondary_pv.position, &turn_around, frame)?
            .delay;
        let transit1 = turn_around.shifted_by(-tau_leg1_down.clone());
        let satellite_pv1 = common
            .emitter_pv
            .shifted_by(&-(tau_leg2_up.clone() + tau_leg1_down.clone()));

        // First leg: primary to satellite, extrapolating the primary from its reception
        let primary_at_arrival =
            TimeStampedPv::new(common.arrival.clone(), frame, common.receiver_pv.clone());
        let tau_leg1_up = self
            .solver
            .adjustable_emitter(&primary_at_arrival)
            .delay(&satellite_pv1.position, &transit1, frame)?
            .delay;
        let departure = transit1.shifted_by(-tau_leg1_up.clone());
        let primary_pv = common.receiver_pv.shifted_by(&-(tau_leg2_down.clone()
            + tau_leg2_up.clone()
            + tau_leg1_down.clone()
            + tau_leg1_up.clone()));

        let range = (tau_leg1_up + tau_leg1_down + tau_leg2_up + tau_leg2_down)
            * (0.5 * SPEED_OF_LIGHT_KM_S);

        let transit1_delta = transit1.seconds_since(common.state.epoch).real();
        Ok(Theoretical {
            values: vec![range],
            transit_states: vec![
                common.state.shifted_by(transit1_delta),
                common.transit_state.clone(),
            ],
            participants: vec![
                TimeStampedPv::new(departure, frame, primary_pv).to_real(),
                TimeStampedPv::new(transit1, frame, satellite_pv1).to_real(),
                TimeStampedPv::new(turn_around, frame, secondary_pv).to_real(),
                common.emitter(),
                common.receiver(),
            ],
        })
    }
}
