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

use super::clock::QuadraticClockModel;
use super::observer::Observer;
use super::params::ParameterDriver;
use crate::ad::linalg::{add, constant, scale};
use crate::ad::{Derivation, Instant, Real};
use crate::cosmic::{
    BodyRotation, Ellipsoid, EarthOrientationOffsets, Frame, OrientationOffsets, PvCoordinates,
    SpacecraftState,
};
use crate::errors::{FrameMismatchSnafu, MeasurementError};
use crate::io::ConfigRepr;
use crate::linalg::Vector3;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt;

pub mod builtin;

/// A ground station on the surface of a rotating body.
///
/// The station position may be adjusted by estimating its east, north and zenith offsets (in km),
/// and the orientation of the body may be adjusted with the Earth orientation offsets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "GroundStationRepr")]
pub struct GroundStation {
    pub name: String,
    /// in degrees
    pub latitude_deg: f64,
    /// in degrees
    pub longitude_deg: f64,
    /// in km
    pub height_km: f64,
    pub ellipsoid: Ellipsoid,
    pub rotation: BodyRotation,
    pub clock: QuadraticClockModel,
    pub east_offset: ParameterDriver,
    pub north_offset: ParameterDriver,
    pub zenith_offset: ParameterDriver,
    pub eop: EarthOrientationOffsets,
}

/// Serialized form of a station, where everything but its name and location is optional.
#[derive(Deserialize)]
struct GroundStationRepr {
    name: String,
    latitude_deg: f64,
    longitude_deg: f64,
    height_km: f64,
    #[serde(default)]
    ellipsoid: Ellipsoid,
    #[serde(default)]
    rotation: BodyRotation,
    clock: Option<QuadraticClockModel>,
    east_offset: Option<ParameterDriver>,
    north_offset: Option<ParameterDriver>,
    zenith_offset: Option<ParameterDriver>,
    #[serde(default)]
    eop: EarthOrientationOffsets,
}

impl From<GroundStationRepr> for GroundStation {
    fn from(repr: GroundStationRepr) -> Self {
        let station = Self::from_point(
            repr.name,
            repr.latitude_deg,
            repr.longitude_deg,
            repr.height_km,
            repr.ellipsoid,
            repr.rotation,
        );
        Self {
            clock: repr.clock.unwrap_or(station.clock),
            east_offset: repr.east_offset.unwrap_or(station.east_offset),
            north_offset: repr.north_offset.unwrap_or(station.north_offset),
            zenith_offset: repr.zenith_offset.unwrap_or(station.zenith_offset),
            eop: repr.eop,
            ..station
        }
    }
}

impl GroundStation {
    /// Initializes a station with a perfect clock referenced to the reference epoch of the rotation model.
    pub fn from_point(
        name: String,
        latitude_deg: f64,
        longitude_deg: f64,
        height_km: f64,
        ellipsoid: Ellipsoid,
        rotation: BodyRotation,
    ) -> Self {
        Self {
            clock: QuadraticClockModel::for_station(&name, rotation.reference_epoch),
            east_offset: ParameterDriver::new(&format!("{name}-offset-East"), 0.0, 1e-3),
            north_offset: ParameterDriver::new(&format!("{name}-offset-North"), 0.0, 1e-3),
            zenith_offset: ParameterDriver::new(&format!("{name}-offset-Zenith"), 0.0, 1e-3),
            name,
            latitude_deg,
            longitude_deg,
            height_km,
            ellipsoid,
            rotation,
            eop: EarthOrientationOffsets::default(),
        }
    }

    /// Returns a copy of this station with a clock of constant offset.
    pub fn with_clock_offset(mut self, offset_s: f64) -> Self {
        self.clock.offset.set_value(offset_s);
        self
    }

    pub fn with_clock(mut self, clock: QuadraticClockModel) -> Self {
        self.clock = clock;
        self
    }

    /// Local east, north and zenith axes at the nominal location of the station, in the body-fixed frame.
    pub fn topocentric_axes(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let lat = self.latitude_deg.to_radians();
        let lon = self.longitude_deg.to_radians();
        (
            Ellipsoid::east(lon),
            Ellipsoid::north(lat, lon),
            Ellipsoid::zenith(lat, lon),
        )
    }

    /// Position of the station in the body-fixed frame, displaced by its offset drivers.
    pub fn body_fixed_position<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        d: &D,
    ) -> Vector3<T> {
        let epoch = instant.to_epoch();
        let nominal = self.ellipsoid.to_cartesian(
            self.latitude_deg.to_radians(),
            self.longitude_deg.to_radians(),
            self.height_km,
        );
        let (east, north, zenith) = self.topocentric_axes();
        let displacement = add(
            &add(
                &scale(&constant(&east), &d.driver_value(&self.east_offset, epoch)),
                &scale(&constant(&north), &d.driver_value(&self.north_offset, epoch)),
            ),
            &scale(&constant(&zenith), &d.driver_value(&self.zenith_offset, epoch)),
        );
        add(&constant(&nominal), &displacement)
    }

    /// Local east, north and zenith axes in the requested frame at the provided instant.
    pub fn topocentric_axes_in<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        frame: Frame,
        d: &D,
    ) -> Result<[Vector3<T>; 3], MeasurementError> {
        let (east, north, zenith) = self.topocentric_axes();
        let axes = [constant(&east), constant(&north), constant(&zenith)];
        if frame == self.rotation.body_fixed {
            return Ok(axes);
        }
        ensure!(
            frame == self.rotation.inertial,
            FrameMismatchSnafu {
                action: "orienting a topocentric frame",
                expected: self.rotation.inertial,
                got: frame,
            }
        );
        let offsets = self.orientation_offsets(instant, d);
        Ok(axes.map(|axis| self.rotation.direction_to_inertial(instant, &axis, &offsets)))
    }

    /// Orientation offsets of the body at the provided instant
    pub fn orientation_offsets<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        d: &D,
    ) -> OrientationOffsets<T> {
        self.eop.at(instant, self.rotation.reference_epoch, d)
    }
}

impl Observer for GroundStation {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn clock(&self) -> &QuadraticClockModel {
        &self.clock
    }

    /// Clock drivers, then position offsets, then the Earth orientation offsets.
    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.clock.drivers().to_vec();
        drivers.extend([&self.east_offset, &self.north_offset, &self.zenith_offset]);
        drivers.extend(self.eop.drivers());
        drivers
    }

    fn pv_at<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        frame: Frame,
        _states: &[SpacecraftState],
        d: &D,
    ) -> Result<PvCoordinates<T>, MeasurementError> {
        let body_fixed =
            PvCoordinates::from_pv(self.body_fixed_position(instant, d), Vector3::zeros());
        if frame == self.rotation.body_fixed {
            return Ok(body_fixed);
        }
        ensure!(
            frame == self.rotation.inertial,
            FrameMismatchSnafu {
                action: "locating a ground station",
                expected: self.rotation.inertial,
                got: frame,
            }
        );
        let offsets = self.orientation_offsets(instant, d);
        Ok(self.rotation.to_inertial(instant, &body_fixed, &offsets))
    }
}

impl ConfigRepr for GroundStation {}

impl Default for GroundStation {
    fn default() -> Self {
        Self::from_point(
            "UNDEFINED".to_string(),
            0.0,
            0.0,
            0.0,
            Ellipsoid::default(),
            BodyRotation::default(),
        )
    }
}

impl fmt::Display for GroundStation {
    // Prints the station name and location
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (lat.: {:.4} deg    long.: {:.4} deg    alt.: {:.3} m) [{}]",
            self.name,
            self.latitude_deg,
            self.longitude_deg,
            self.height_km * 1e3,
            self.rotation.body_fixed,
        )
    }
}
