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

/*! Orbit determination measurement layer: observers, clocks, estimable parameters, the light time
solver, and the theoretical measurement models. */

/// Quadratic clock models of stations and satellites
pub mod clock;

/// Ground stations on the surface of a rotating body
pub mod ground_station;
pub use ground_station::GroundStation;

/// Provides all of the supported measurement models
pub mod msr;

/// Anything which may emit or receive a signal
pub mod observer;

/// Parameter drivers and the layout of the partial derivatives
pub mod params;

/// Light time computations and the geometry of a signal
pub mod signal;

pub use clock::{ClockOffset, QuadraticClockModel};
pub use observer::{ObservableSatellite, Observer, ObserverProvider};

#[allow(unused_imports)]
pub mod prelude {
    pub use super::ground_station::builtin::*;
    pub use super::msr::*;
    pub use super::params::*;
    pub use super::signal::*;
    pub use super::*;

    pub use crate::cosmic::{SpacecraftState, EARTH_J2000, IAU_EARTH_FRAME};
    pub use crate::time::{Duration, Epoch, TimeUnits, Unit};
}
