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

use super::clock::{ClockOffset, QuadraticClockModel};
use super::params::{ParameterDriver, ParameterIndices};
use crate::ad::{Derivation, Instant, Real};
use crate::cosmic::{Frame, PvCoordinates, PvProvider, SpacecraftState};
use crate::errors::{FrameMismatchSnafu, MeasurementError};
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;

/// Anything which emits or receives a signal: a ground station or a satellite.
///
/// An observer has a clock and a position. Its position may depend on the spacecraft states being
/// estimated (for a satellite) or only on its own parameter drivers (for a ground station).
pub trait Observer: Send + Sync {
    fn name(&self) -> String;

    fn clock(&self) -> &QuadraticClockModel;

    /// All of the drivers of this observer, clock included, selected or not.
    fn parameter_drivers(&self) -> Vec<&ParameterDriver>;

    /// Position and velocity of this observer in `frame` at the provided instant.
    fn pv_at<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        frame: Frame,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<PvCoordinates<T>, MeasurementError>;

    fn clock_offset_at<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        d: &D,
    ) -> ClockOffset<T> {
        self.clock().offset_at(instant, d)
    }
}

/// A satellite involved in a measurement: its index in the list of states and its clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservableSatellite {
    pub index: usize,
    pub clock: QuadraticClockModel,
}

impl ObservableSatellite {
    /// The satellite at the provided index, with a perfect clock referenced to J2000.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            clock: QuadraticClockModel::for_satellite(
                index,
                Epoch::from_gregorian_utc_at_noon(2000, 1, 1),
            ),
        }
    }

    pub fn with_clock(mut self, clock: QuadraticClockModel) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the state of this satellite in the provided list.
    pub fn state<'a>(
        &self,
        states: &'a [SpacecraftState],
    ) -> Result<&'a SpacecraftState, MeasurementError> {
        states.get(self.index).ok_or(MeasurementError::MissingState {
            index: self.index,
            count: states.len(),
        })
    }
}

impl Observer for ObservableSatellite {
    fn name(&self) -> String {
        format!("satellite-{}", self.index)
    }

    fn clock(&self) -> &QuadraticClockModel {
        &self.clock
    }

    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        self.clock.drivers().to_vec()
    }

    fn pv_at<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        frame: Frame,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<PvCoordinates<T>, MeasurementError> {
        let state = self.state(states)?;
        ensure!(
            state.frame == frame,
            FrameMismatchSnafu {
                action: "locating a satellite",
                expected: state.frame,
                got: frame,
            }
        );
        let pv = PvCoordinates::from_state(state, ParameterIndices::state_offset(self.index), d);
        Ok(pv.shifted_by(&instant.seconds_since(state.epoch)))
    }
}

/// Exposes an observer as a position provider for the light time computations.
pub struct ObserverProvider<'a, O: Observer, D> {
    pub observer: &'a O,
    pub states: &'a [SpacecraftState],
    pub d: &'a D,
}

impl<'a, O: Observer, D> ObserverProvider<'a, O, D> {
    pub fn new(observer: &'a O, states: &'a [SpacecraftState], d: &'a D) -> Self {
        Self { observer, states, d }
    }
}

impl<T: Real, O: Observer, D: Derivation<T>> PvProvider<T> for ObserverProvider<'_, O, D> {
    fn pv_at(
        &self,
        instant: &Instant<T>,
        frame: Frame,
    ) -> Result<PvCoordinates<T>, MeasurementError> {
        self.observer.pv_at(instant, frame, self.states, self.d)
    }
}
