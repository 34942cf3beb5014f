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

use super::{Frame, Orbit, PvCoordinates};
use crate::linalg::Vector3;
use crate::time::{Epoch, TimeUnits};
use std::fmt;

/// The Cartesian state of a spacecraft at an epoch, as provided by the propagation layer.
///
/// Shifting a state in time uses a second order Taylor expansion, which is only meant for the few
/// milliseconds of a light time correction. When a gravitational parameter is set, the Keplerian
/// part of the acceleration is recomputed after each shift.
#[derive(Clone, Debug, PartialEq)]
pub struct SpacecraftState {
    pub epoch: Epoch,
    pub frame: Frame,
    pub position_km: Vector3<f64>,
    pub velocity_km_s: Vector3<f64>,
    pub acceleration_km_s2: Vector3<f64>,
    /// Gravitational parameter of the central body, if the acceleration has a Keplerian part
    pub mu_km3_s2: Option<f64>,
}

impl SpacecraftState {
    /// Initializes a state without any acceleration.
    pub fn new(
        epoch: Epoch,
        frame: Frame,
        position_km: Vector3<f64>,
        velocity_km_s: Vector3<f64>,
    ) -> Self {
        Self {
            epoch,
            frame,
            position_km,
            velocity_km_s,
            acceleration_km_s2: Vector3::zeros(),
            mu_km3_s2: None,
        }
    }

    /// Returns a copy of this state whose acceleration is the Keplerian acceleration of a body of gravitational parameter `mu_km3_s2`.
    pub fn with_keplerian_acceleration(mut self, mu_km3_s2: f64) -> Self {
        self.mu_km3_s2 = Some(mu_km3_s2);
        self.acceleration_km_s2 = self.keplerian_acceleration();
        self
    }

    /// Returns a copy of this state with the provided total acceleration.
    pub fn with_acceleration(mut self, acceleration_km_s2: Vector3<f64>) -> Self {
        self.acceleration_km_s2 = acceleration_km_s2;
        self
    }

    /// Keplerian part of the acceleration, zero if no gravitational parameter is set.
    pub fn keplerian_acceleration(&self) -> Vector3<f64> {
        match self.mu_km3_s2 {
            Some(mu) => {
                let r = self.position_km.norm();
                -mu / (r * r * r) * self.position_km
            }
            None => Vector3::zeros(),
        }
    }

    /// Returns this state shifted by `dt_s` seconds (may be negative).
    pub fn shifted_by(&self, dt_s: f64) -> Self {
        let non_keplerian = self.acceleration_km_s2 - self.keplerian_acceleration();
        let pv = PvCoordinates::new(self.position_km, self.velocity_km_s, self.acceleration_km_s2)
            .shifted_by(&dt_s);
        let mut shifted = Self {
            epoch: self.epoch + dt_s.seconds(),
            frame: self.frame,
            position_km: pv.position,
            velocity_km_s: pv.velocity,
            acceleration_km_s2: non_keplerian,
            mu_km3_s2: self.mu_km3_s2,
        };
        shifted.acceleration_km_s2 += shifted.keplerian_acceleration();
        shifted
    }

    /// Position, velocity and acceleration of this state
    pub fn pv(&self) -> PvCoordinates<f64> {
        PvCoordinates::new(self.position_km, self.velocity_km_s, self.acceleration_km_s2)
    }
}

impl From<Orbit> for SpacecraftState {
    /// Uses the gravitational parameter of the frame of the orbit if it is defined.
    fn from(orbit: Orbit) -> Self {
        let state = Self::new(orbit.epoch, orbit.frame, orbit.radius_km, orbit.velocity_km_s);
        match orbit.frame.mu_km3_s2() {
            Ok(mu) => state.with_keplerian_acceleration(mu),
            Err(_) => state,
        }
    }
}

impl fmt::Display for SpacecraftState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})\t{}", self.epoch, self.frame, self.pv())
    }
}
