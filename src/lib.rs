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

/*! # nyx-measurements

Theoretical measurement models for orbit determination, with the exact partial derivatives of each
measurement with respect to the spacecraft states and to the estimated parameters (clock offsets,
station positions, Earth orientation).

Every model relies on the light time solver of [od::signal] to find the self-consistent geometry
of the signal, and is written once over the [ad::Real] trait so that the same code computes either
plain values or values with their gradients.
*/

/// Forward-mode automatic differentiation
pub mod ad;

/// Provides spacecraft states, body shapes and body rotations.
pub mod cosmic;

/// Utility functions shared by different modules.
pub mod utils;

mod errors;
/// Measurement models (almost) never panic and functions which may fail will return an error.
pub use self::errors::MeasurementError;

/// Loading of the configuration files.
pub mod io;

/// All of the orbit determination measurement models.
pub mod od;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::SpacecraftState;
