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

use super::*;

impl GroundStation {
    pub fn dss65_madrid() -> Self {
        Self::from_point(
            "Madrid".to_string(),
            40.427_222,
            4.250_556,
            0.834_939,
            Ellipsoid::wgs84(),
            BodyRotation::earth(),
        )
    }

    pub fn dss34_canberra() -> Self {
        Self::from_point(
            "Canberra".to_string(),
            -35.398_333,
            148.981_944,
            0.691_750,
            Ellipsoid::wgs84(),
            BodyRotation::earth(),
        )
    }

    pub fn dss13_goldstone() -> Self {
        Self::from_point(
            "Goldstone".to_string(),
            35.247_164,
            243.205,
            1.071_149_04,
            Ellipsoid::wgs84(),
            BodyRotation::earth(),
        )
    }
}
