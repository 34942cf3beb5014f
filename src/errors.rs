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

use crate::cosmic::Frame;
use crate::od::msr::MeasurementType;
use crate::time::Epoch;
use snafu::prelude::*;

/// Errors raised while evaluating a measurement model.
///
/// Failures to converge of the light time solver are not errors: the last iterate is used.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MeasurementError {
    #[snafu(display("{action} requires the {expected} frame but got {got}"))]
    FrameMismatch {
        action: &'static str,
        expected: Frame,
        got: Frame,
    },
    #[snafu(display("{kind} measurement requires {need} spacecraft state(s), got {got}"))]
    StateCount {
        kind: MeasurementType,
        need: usize,
        got: usize,
    },
    #[snafu(display("no spacecraft state for satellite #{index} ({count} state(s) provided)"))]
    MissingState { index: usize, count: usize },
    #[snafu(display("parameter {name}: {reason}"))]
    InvalidParameter { name: String, reason: String },
    #[snafu(display("invalid measurement @ {epoch}: {reason}"))]
    InvalidMeasurement { epoch: Epoch, reason: String },
}
