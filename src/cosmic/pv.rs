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

use super::{Frame, SpacecraftState};
use crate::ad::linalg::{add, constant, norm, real, scale, scale_by};
use crate::ad::{Derivation, Instant, Real};
use crate::errors::{FrameMismatchSnafu, MeasurementError};
use crate::linalg::Vector3;
use snafu::ensure;
use std::fmt;

/// Position (km), velocity (km/s) and acceleration (km/s^2) of a point.
#[derive(Clone, Debug, PartialEq)]
pub struct PvCoordinates<T: Real> {
    pub position: Vector3<T>,
    pub velocity: Vector3<T>,
    pub acceleration: Vector3<T>,
}

impl<T: Real> PvCoordinates<T> {
    pub fn new(position: Vector3<T>, velocity: Vector3<T>, acceleration: Vector3<T>) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    /// A point with no acceleration
    pub fn from_pv(position: Vector3<T>, velocity: Vector3<T>) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector3::zeros(),
        }
    }

    /// Lifts constant coordinates
    pub fn constant(pv: &PvCoordinates<f64>) -> Self {
        Self {
            position: constant(&pv.position),
            velocity: constant(&pv.velocity),
            acceleration: constant(&pv.acceleration),
        }
    }

    /// Builds the coordinates of a spacecraft state whose position and velocity are the six
    /// independent variables starting at `first_index`.
    ///
    /// If the state carries a gravitational parameter, the Keplerian part of the acceleration is
    /// recomputed from the differentiated position so that shifting these coordinates in time
    /// carries the correct partials. Any other acceleration is kept as a constant.
    pub fn from_state<D: Derivation<T>>(
        state: &SpacecraftState,
        first_index: usize,
        d: &D,
    ) -> Self {
        let position = Vector3::new(
            d.state_component(state.position_km.x, first_index),
            d.state_component(state.position_km.y, first_index + 1),
            d.state_component(state.position_km.z, first_index + 2),
        );
        let velocity = Vector3::new(
            d.state_component(state.velocity_km_s.x, first_index + 3),
            d.state_component(state.velocity_km_s.y, first_index + 4),
            d.state_component(state.velocity_km_s.z, first_index + 5),
        );
        let acceleration = match state.mu_km3_s2 {
            Some(mu) => {
                let r = norm(&position);
                let r3 = r.clone() * r.clone() * r;
                let keplerian = scale(&scale_by(&position, -mu), &(T::one() / r3));
                let non_keplerian = state.acceleration_km_s2 - state.keplerian_acceleration();
                add(&keplerian, &constant(&non_keplerian))
            }
            None => constant(&state.acceleration_km_s2),
        };
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    /// Returns these coordinates shifted by `dt` seconds using a second order Taylor expansion.
    pub fn shifted_by(&self, dt: &T) -> Self {
        let half_dt2 = dt.clone() * dt.clone() * 0.5;
        Self {
            position: add(
                &add(&self.position, &scale(&self.velocity, dt)),
                &scale(&self.acceleration, &half_dt2),
            ),
            velocity: add(&self.velocity, &scale(&self.acceleration, dt)),
            acceleration: self.acceleration.clone(),
        }
    }

    /// Drops the partials
    pub fn to_real(&self) -> PvCoordinates<f64> {
        PvCoordinates {
            position: real(&self.position),
            velocity: real(&self.velocity),
            acceleration: real(&self.acceleration),
        }
    }
}

impl<T: Real> fmt::Display for PvCoordinates<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pv = self.to_real();
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}] km\t[{:.9}, {:.9}, {:.9}] km/s",
            pv.position.x,
            pv.position.y,
            pv.position.z,
            pv.velocity.x,
            pv.velocity.y,
            pv.velocity.z
        )
    }
}

/// Provides the position and velocity of a point as a function of time.
pub trait PvProvider<T: Real> {
    /// Returns the coordinates in the requested frame at the requested instant.
    fn pv_at(&self, instant: &Instant<T>, frame: Frame)
        -> Result<PvCoordinates<T>, MeasurementError>;

    /// Returns only the position in the requested frame at the requested instant.
    fn position_at(
        &self,
        instant: &Instant<T>,
        frame: Frame,
    ) -> Result<Vector3<T>, MeasurementError> {
        Ok(self.pv_at(instant, frame)?.position)
    }
}

/// Coordinates known at one instant in one frame, extrapolated in time with a Taylor expansion.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStampedPv<T: Real> {
    pub instant: Instant<T>,
    pub frame: Frame,
    pub pv: PvCoordinates<T>,
}

impl<T: Real> TimeStampedPv<T> {
    pub fn new(instant: Instant<T>, frame: Frame, pv: PvCoordinates<T>) -> Self {
        Self { instant, frame, pv }
    }

    /// Drops the partials
    pub fn to_real(&self) -> TimeStampedPv<f64> {
        TimeStampedPv {
            instant: self.instant.to_real(),
            frame: self.frame,
            pv: self.pv.to_real(),
        }
    }
}

impl<T: Real> PvProvider<T> for TimeStampedPv<T> {
    fn pv_at(
        &self,
        instant: &Instant<T>,
        frame: Frame,
    ) -> Result<PvCoordinates<T>, MeasurementError> {
        ensure!(
            frame == self.frame,
            FrameMismatchSnafu {
                action: "shifting time stamped coordinates",
                expected: self.frame,
                got: frame,
            }
        );
        Ok(self.pv.shifted_by(&instant.duration_from(&self.instant)))
    }
}

impl<T: Real> fmt::Display for TimeStampedPv<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})\t{}", self.instant, self.frame, self.pv)
    }
}
