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

use crate::linalg::Vector3;
use serde_derive::{Deserialize, Serialize};

/// A one-axis ellipsoid used to convert geodetic coordinates into body-fixed Cartesian coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub equatorial_radius_km: f64,
    pub flattening: f64,
}

impl Ellipsoid {
    /// The WGS84 Earth ellipsoid
    pub const fn wgs84() -> Self {
        Self {
            equatorial_radius_km: 6378.137,
            flattening: 1.0 / 298.257223563,
        }
    }

    pub const fn sphere(radius_km: f64) -> Self {
        Self {
            equatorial_radius_km: radius_km,
            flattening: 0.0,
        }
    }

    /// Squared first eccentricity
    fn e2(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Converts geodetic coordinates (angles in radians) into body-fixed Cartesian coordinates in km.
    pub fn to_cartesian(
        &self,
        latitude_rad: f64,
        longitude_rad: f64,
        height_km: f64,
    ) -> Vector3<f64> {
        let (sin_lat, cos_lat) = latitude_rad.sin_cos();
        let (sin_lon, cos_lon) = longitude_rad.sin_cos();
        let e2 = self.e2();
        let n = self.equatorial_radius_km / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        Vector3::new(
            (n + height_km) * cos_lat * cos_lon,
            (n + height_km) * cos_lat * sin_lon,
            (n * (1.0 - e2) + height_km) * sin_lat,
        )
    }

    /// Local east direction at the provided longitude
    pub fn east(longitude_rad: f64) -> Vector3<f64> {
        let (sin_lon, cos_lon) = longitude_rad.sin_cos();
        Vector3::new(-sin_lon, cos_lon, 0.0)
    }

    /// Local north direction, tangent to the meridian
    pub fn north(latitude_rad: f64, longitude_rad: f64) -> Vector3<f64> {
        let (sin_lat, cos_lat) = latitude_rad.sin_cos();
        let (sin_lon, cos_lon) = longitude_rad.sin_cos();
        Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat)
    }

    /// Local vertical, normal to the ellipsoid
    pub fn zenith(latitude_rad: f64, longitude_rad: f64) -> Vector3<f64> {
        let (sin_lat, cos_lat) = latitude_rad.sin_cos();
        let (sin_lon, cos_lon) = longitude_rad.sin_cos();
        Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}
