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

use super::Real;
use crate::time::{Epoch, TimeUnits};
use std::fmt;

/// A date which may depend on the estimated parameters.
///
/// The date is stored as an exact [Epoch] and an offset in seconds of type `T`, so that light time
/// corrections (a few milliseconds) never suffer from the nanosecond resolution of an epoch, and so
/// that the offset may carry partial derivatives (e.g. when the reception date depends on a clock
/// offset being estimated).
#[derive(Clone, Debug, PartialEq)]
pub struct Instant<T: Real> {
    pub epoch: Epoch,
    pub offset_s: T,
}

impl<T: Real> Instant<T> {
    pub fn new(epoch: Epoch, offset_s: T) -> Self {
        Self { epoch, offset_s }
    }

    /// An instant exactly at the provided epoch
    pub fn at(epoch: Epoch) -> Self {
        Self {
            epoch,
            offset_s: T::zero(),
        }
    }

    /// Returns a new instant shifted by `dt_s` seconds (may be negative)
    pub fn shifted_by(&self, dt_s: T) -> Self {
        Self {
            epoch: self.epoch,
            offset_s: self.offset_s.clone() + dt_s,
        }
    }

    /// Returns `self - other` in seconds.
    pub fn duration_from(&self, other: &Self) -> T {
        T::constant((self.epoch - other.epoch).to_seconds())
            + (self.offset_s.clone() - other.offset_s.clone())
    }

    /// Returns `self - epoch` in seconds.
    pub fn seconds_since(&self, epoch: Epoch) -> T {
        self.offset_s.clone() + (self.epoch - epoch).to_seconds()
    }

    /// Returns `self - epoch` as an exact epoch difference in seconds and the offset of this instant.
    ///
    /// Far from `epoch`, adding the offset to the epoch difference would round away the few
    /// nanoseconds of a light time correction: callers combine both parts after scaling them.
    pub fn split_since(&self, epoch: Epoch) -> (f64, T) {
        ((self.epoch - epoch).to_seconds(), self.offset_s.clone())
    }

    /// Returns the closest epoch to this instant, dropping the partials.
    pub fn to_epoch(&self) -> Epoch {
        self.epoch + self.offset_s.real().seconds()
    }

    /// Returns the same instant without partials.
    pub fn to_real(&self) -> Instant<f64> {
        Instant {
            epoch: self.epoch,
            offset_s: self.offset_s.real(),
        }
    }
}

impl<T: Real> fmt::Display for Instant<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:+e} s", self.epoch, self.offset_s.real())
    }
}
