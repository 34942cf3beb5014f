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

use super::params::ParameterDriver;
use crate::ad::{Derivation, Instant, Real};
use crate::io::{epoch_from_str, epoch_to_str, ConfigRepr};
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Offset of a clock with respect to the reference time scale, and its first two derivatives.
#[derive(Clone, Debug, PartialEq)]
pub struct ClockOffset<T: Real> {
    /// Offset in seconds, positive when the clock is ahead
    pub offset_s: T,
    /// Rate of the offset (s/s)
    pub rate: T,
    /// Acceleration of the offset (1/s)
    pub acceleration: T,
}

/// A clock whose offset is a second order polynomial of time: `a0 + a1·dt + a2·dt²`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadraticClockModel {
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub reference_epoch: Epoch,
    /// Constant term, in seconds
    pub offset: ParameterDriver,
    /// Linear term, in s/s
    pub drift: ParameterDriver,
    /// Quadratic term, in 1/s
    pub acceleration: ParameterDriver,
}

impl QuadraticClockModel {
    /// Initializes a perfect clock with the provided driver names.
    fn named(offset: String, drift: String, acceleration: String, reference_epoch: Epoch) -> Self {
        Self {
            reference_epoch,
            offset: ParameterDriver::new(&offset, 0.0, 1e-6),
            drift: ParameterDriver::new(&drift, 0.0, 1e-9),
            acceleration: ParameterDriver::new(&acceleration, 0.0, 1e-12),
        }
    }

    /// Clock of a ground station, e.g. the `Madrid-clock` driver
    pub fn for_station(name: &str, reference_epoch: Epoch) -> Self {
        Self::named(
            format!("{name}-clock"),
            format!("{name}-clock-drift"),
            format!("{name}-clock-acceleration"),
            reference_epoch,
        )
    }

    /// Clock of the satellite at the provided position in the state list, e.g. the `clock-offset-satellite-0` driver
    pub fn for_satellite(index: usize, reference_epoch: Epoch) -> Self {
        Self::named(
            format!("clock-offset-satellite-{index}"),
            format!("clock-drift-satellite-{index}"),
            format!("clock-acceleration-satellite-{index}"),
            reference_epoch,
        )
    }

    /// Returns a copy of this clock with the provided polynomial coefficients.
    pub fn with_coefficients(mut self, offset_s: f64, drift: f64, acceleration: f64) -> Self {
        self.offset.set_value(offset_s);
        self.drift.set_value(drift);
        self.acceleration.set_value(acceleration);
        self
    }

    pub fn drivers(&self) -> [&ParameterDriver; 3] {
        [&self.offset, &self.drift, &self.acceleration]
    }

    pub fn drivers_mut(&mut self) -> [&mut ParameterDriver; 3] {
        [&mut self.offset, &mut self.drift, &mut self.acceleration]
    }

    /// Evaluates the clock offset at the provided instant.
    pub fn offset_at<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        d: &D,
    ) -> ClockOffset<T> {
        let epoch = instant.to_epoch();
        let (epoch_dt, offset_dt) = instant.split_since(self.reference_epoch);
        let a0 = d.driver_value(&self.offset, epoch);
        let a1 = d.driver_value(&self.drift, epoch);
        let a2 = d.driver_value(&self.acceleration, epoch);
        // dt = epoch_dt + offset_dt, expanded so that the offset is never rounded away
        let linear = a1.clone() * epoch_dt + a1.clone() * offset_dt.clone();
        let dt2_small =
            offset_dt.clone() * (2.0 * epoch_dt) + offset_dt.clone() * offset_dt.clone();
        let quadratic = a2.clone() * (epoch_dt * epoch_dt) + a2.clone() * dt2_small;
        ClockOffset {
            offset_s: a0 + linear + quadratic,
            rate: a1 + a2.clone() * (2.0 * epoch_dt) + a2.clone() * offset_dt * 2.0,
            acceleration: a2 * 2.0,
        }
    }
}

impl ConfigRepr for QuadraticClockModel {}

impl fmt::Display for QuadraticClockModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:e} s + {:e}·dt + {:e}·dt² (dt from {})",
            self.offset.value(),
            self.drift.value(),
            self.acceleration.value(),
            self.reference_epoch
        )
    }
}
