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

use super::{Frame, PvCoordinates, EARTH_J2000, IAU_EARTH_FRAME};
use crate::ad::linalg::{add, cross, scale_by};
use crate::ad::{Derivation, Instant, Real};
use crate::io::{epoch_from_str, epoch_to_str};
use crate::linalg::Vector3;
use crate::od::params::ParameterDriver;
use crate::time::Epoch;
use crate::utils::normalize_angle;
use anise::constants::usual_planetary_constants::MEAN_EARTH_ANGULAR_VELOCITY_DEG_S;
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Scale of the angular parameter drivers, about 0.05 arcsec
const ANGULAR_SCALE: f64 = 2.384185791015625e-7;

/// Rotates `v` by `angle` about the X axis
fn rotate_x<T: Real>(v: &Vector3<T>, angle: &T) -> Vector3<T> {
    let (s, c) = (angle.clone().sin(), angle.clone().cos());
    Vector3::new(
        v.x.clone(),
        c.clone() * v.y.clone() - s.clone() * v.z.clone(),
        s * v.y.clone() + c * v.z.clone(),
    )
}

/// Rotates `v` by `angle` about the Y axis
fn rotate_y<T: Real>(v: &Vector3<T>, angle: &T) -> Vector3<T> {
    let (s, c) = (angle.clone().sin(), angle.clone().cos());
    Vector3::new(
        c.clone() * v.x.clone() + s.clone() * v.z.clone(),
        v.y.clone(),
        c * v.z.clone() - s * v.x.clone(),
    )
}

/// Rotates `v` by `angle` about the Z axis
fn rotate_z<T: Real>(v: &Vector3<T>, angle: &T) -> Vector3<T> {
    let (s, c) = (angle.clone().sin(), angle.clone().cos());
    Vector3::new(
        c.clone() * v.x.clone() - s.clone() * v.y.clone(),
        s * v.x.clone() + c * v.y.clone(),
        v.z.clone(),
    )
}

/// Values of the orientation offsets at one instant, in radians and radians per second.
#[derive(Clone, Debug, PartialEq)]
pub struct OrientationOffsets<T: Real> {
    pub meridian_rad: T,
    pub meridian_rate_rad_s: T,
    pub polar_x_rad: T,
    pub polar_y_rad: T,
}

impl<T: Real> OrientationOffsets<T> {
    pub fn zero() -> Self {
        Self {
            meridian_rad: T::zero(),
            meridian_rate_rad_s: T::zero(),
            polar_x_rad: T::zero(),
            polar_y_rad: T::zero(),
        }
    }
}

/// Estimable corrections to the orientation of the Earth: a prime meridian offset and drift, and the
/// polar motion offsets and drifts about the X and Y axes.
///
/// The driver names are the same for every station, so that stations observing the same Earth
/// share the same partial derivatives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarthOrientationOffsets {
    pub prime_meridian_offset: ParameterDriver,
    pub prime_meridian_drift: ParameterDriver,
    pub polar_offset_x: ParameterDriver,
    pub polar_drift_x: ParameterDriver,
    pub polar_offset_y: ParameterDriver,
    pub polar_drift_y: ParameterDriver,
}

impl EarthOrientationOffsets {
    pub fn drivers(&self) -> [&ParameterDriver; 6] {
        [
            &self.prime_meridian_offset,
            &self.prime_meridian_drift,
            &self.polar_offset_x,
            &self.polar_drift_x,
            &self.polar_offset_y,
            &self.polar_drift_y,
        ]
    }

    pub fn drivers_mut(&mut self) -> [&mut ParameterDriver; 6] {
        [
            &mut self.prime_meridian_offset,
            &mut self.prime_meridian_drift,
            &mut self.polar_offset_x,
            &mut self.polar_drift_x,
            &mut self.polar_offset_y,
            &mut self.polar_drift_y,
        ]
    }

    /// Evaluates the offsets at the provided instant, drifts being counted from `reference_epoch`.
    pub fn at<T: Real, D: Derivation<T>>(
        &self,
        instant: &Instant<T>,
        reference_epoch: Epoch,
        d: &D,
    ) -> OrientationOffsets<T> {
        let epoch = instant.to_epoch();
        let (epoch_dt, offset_dt) = instant.split_since(reference_epoch);
        let drifted = |offset: &ParameterDriver, drift: T| {
            d.driver_value(offset, epoch) + drift.clone() * epoch_dt + drift * offset_dt.clone()
        };
        let meridian_rate_rad_s = d.driver_value(&self.prime_meridian_drift, epoch);
        OrientationOffsets {
            meridian_rad: drifted(&self.prime_meridian_offset, meridian_rate_rad_s.clone()),
            meridian_rate_rad_s,
            polar_x_rad: drifted(
                &self.polar_offset_x,
                d.driver_value(&self.polar_drift_x, epoch),
            ),
            polar_y_rad: drifted(
                &self.polar_offset_y,
                d.driver_value(&self.polar_drift_y, epoch),
            ),
        }
    }
}

impl Default for EarthOrientationOffsets {
    fn default() -> Self {
        Self {
            prime_meridian_offset: ParameterDriver::new(
                "prime-meridian-offset",
                0.0,
                ANGULAR_SCALE,
            ),
            prime_meridian_drift: ParameterDriver::new("prime-meridian-drift", 0.0, ANGULAR_SCALE),
            polar_offset_x: ParameterDriver::new("polar-offset-X", 0.0, ANGULAR_SCALE),
            polar_drift_x: ParameterDriver::new("polar-drift-X", 0.0, ANGULAR_SCALE),
            polar_offset_y: ParameterDriver::new("polar-offset-Y", 0.0, ANGULAR_SCALE),
            polar_drift_y: ParameterDriver::new("polar-drift-Y", 0.0, ANGULAR_SCALE),
        }
    }
}

/// Uniform rotation of a body-fixed frame about the Z axis of an inertial frame, corrected by
/// orientation offsets (prime meridian and polar motion).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyRotation {
    pub inertial: Frame,
    pub body_fixed: Frame,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub reference_epoch: Epoch,
    /// Angle of the prime meridian at the reference epoch
    pub angle_at_reference_rad: f64,
    pub rate_rad_s: f64,
}

impl BodyRotation {
    /// Mean rotation of the Earth, from the sidereal angle at J2000.
    pub fn earth() -> Self {
        Self {
            inertial: EARTH_J2000,
            body_fixed: IAU_EARTH_FRAME,
            reference_epoch: Epoch::from_gregorian_utc_at_noon(2000, 1, 1),
            angle_at_reference_rad: 280.46061837_f64.to_radians(),
            rate_rad_s: MEAN_EARTH_ANGULAR_VELOCITY_DEG_S.to_radians(),
        }
    }

    /// A frame which never rotates with respect to the inertial frame
    pub fn fixed(inertial: Frame, body_fixed: Frame, reference_epoch: Epoch) -> Self {
        Self {
            inertial,
            body_fixed,
            reference_epoch,
            angle_at_reference_rad: 0.0,
            rate_rad_s: 0.0,
        }
    }

    /// Rotation angle of the body-fixed frame at the provided instant
    pub fn angle<T: Real>(&self, instant: &Instant<T>, offsets: &OrientationOffsets<T>) -> T {
        let (epoch_dt, offset_dt) = instant.split_since(self.reference_epoch);
        let nominal = normalize_angle(epoch_dt * self.rate_rad_s + self.angle_at_reference_rad, PI);
        offset_dt * self.rate_rad_s + nominal + offsets.meridian_rad.clone()
    }

    fn rotate_to_inertial<T: Real>(
        &self,
        v: &Vector3<T>,
        angle: &T,
        offsets: &OrientationOffsets<T>,
    ) -> Vector3<T> {
        let tirs = rotate_y(
            &rotate_x(v, &-offsets.polar_y_rad.clone()),
            &-offsets.polar_x_rad.clone(),
        );
        rotate_z(&tirs, angle)
    }

    /// Converts body-fixed coordinates into inertial coordinates.
    pub fn to_inertial<T: Real>(
        &self,
        instant: &Instant<T>,
        body_fixed: &PvCoordinates<T>,
        offsets: &OrientationOffsets<T>,
    ) -> PvCoordinates<T> {
        let angle = self.angle(instant, offsets);
        let omega = Vector3::new(
            T::zero(),
            T::zero(),
            offsets.meridian_rate_rad_s.clone() + self.rate_rad_s,
        );
        let position = self.rotate_to_inertial(&body_fixed.position, &angle, offsets);
        let velocity_rel = self.rotate_to_inertial(&body_fixed.velocity, &angle, offsets);
        let acceleration_rel = self.rotate_to_inertial(&body_fixed.acceleration, &angle, offsets);

        let velocity = add(&velocity_rel, &cross(&omega, &position));
        let acceleration = add(
            &add(&acceleration_rel, &scale_by(&cross(&omega, &velocity_rel), 2.0)),
            &cross(&omega, &cross(&omega, &position)),
        );
        PvCoordinates::new(position, velocity, acceleration)
    }

    /// Expresses a body-fixed direction in the inertial frame (no transport terms).
    pub fn direction_to_inertial<T: Real>(
        &self,
        instant: &Instant<T>,
        body_fixed: &Vector3<T>,
        offsets: &OrientationOffsets<T>,
    ) -> Vector3<T> {
        let angle = self.angle(instant, offsets);
        self.rotate_to_inertial(body_fixed, &angle, offsets)
    }

    /// Expresses an inertial direction in the body-fixed frame (no transport terms).
    pub fn direction_to_body_fixed<T: Real>(
        &self,
        instant: &Instant<T>,
        inertial: &Vector3<T>,
        offsets: &OrientationOffsets<T>,
    ) -> Vector3<T> {
        let angle = self.angle(instant, offsets);
        let tirs = rotate_z(inertial, &-angle);
        rotate_x(&rotate_y(&tirs, &offsets.polar_x_rad), &offsets.polar_y_rad)
    }
}

impl Default for BodyRotation {
    fn default() -> Self {
        Self::earth()
    }
}
