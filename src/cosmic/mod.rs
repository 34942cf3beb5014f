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

/*! Geometry collaborators of the measurement models: spacecraft states and their position/velocity
providers, body shape, and the rotation of body-fixed frames. */

pub use anise::constants::frames::{EARTH_J2000, IAU_EARTH_FRAME};
pub use anise::prelude::{Frame, Orbit};

mod geodesy;
mod pv;
mod rotations;
mod spacecraft;

pub use geodesy::Ellipsoid;
pub use pv::{PvCoordinates, PvProvider, TimeStampedPv};
pub use rotations::{BodyRotation, EarthOrientationOffsets, OrientationOffsets};
pub use spacecraft::SpacecraftState;

/// Speed of light in meters per second, exact value
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Speed of light in kilometers per second
pub const SPEED_OF_LIGHT_KM_S: f64 = SPEED_OF_LIGHT_M_S / 1000.0;
