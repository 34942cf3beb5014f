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

//! Vector helpers over any [Real] scalar, without requiring the scalar to be `Copy`.

use super::Real;
use crate::linalg::Vector3;

/// Returns `a · b`
pub fn dot<T: Real>(a: &Vector3<T>, b: &Vector3<T>) -> T {
    a.x.clone() * b.x.clone() + a.y.clone() * b.y.clone() + a.z.clone() * b.z.clone()
}

/// Returns the Euclidian norm of `v`
pub fn norm<T: Real>(v: &Vector3<T>) -> T {
    dot(v, v).sqrt()
}

/// Returns `a + b`
pub fn add<T: Real>(a: &Vector3<T>, b: &Vector3<T>) -> Vector3<T> {
    a.zip_map(b, |x, y| x + y)
}

/// Returns `a - b`
pub fn sub<T: Real>(a: &Vector3<T>, b: &Vector3<T>) -> Vector3<T> {
    a.zip_map(b, |x, y| x - y)
}

/// Returns `k * v`
pub fn scale<T: Real>(v: &Vector3<T>, k: &T) -> Vector3<T> {
    v.map(|x| x * k.clone())
}

/// Returns `k * v` for a constant `k`
pub fn scale_by<T: Real>(v: &Vector3<T>, k: f64) -> Vector3<T> {
    v.map(|x| x * k)
}

/// Returns the unit vector of `v`
pub fn normalize<T: Real>(v: &Vector3<T>) -> Vector3<T> {
    let n = norm(v);
    v.map(|x| x / n.clone())
}

/// Returns `a × b`
pub fn cross<T: Real>(a: &Vector3<T>, b: &Vector3<T>) -> Vector3<T> {
    Vector3::new(
        a.y.clone() * b.z.clone() - a.z.clone() * b.y.clone(),
        a.z.clone() * b.x.clone() - a.x.clone() * b.z.clone(),
        a.x.clone() * b.y.clone() - a.y.clone() * b.x.clone(),
    )
}

/// Lifts a constant vector
pub fn constant<T: Real>(v: &Vector3<f64>) -> Vector3<T> {
    v.map(T::constant)
}

/// Drops the partials of a vector
pub fn real<T: Real>(v: &Vector3<T>) -> Vector3<f64> {
    v.map(|x| x.real())
}
