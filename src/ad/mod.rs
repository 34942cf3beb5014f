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

/*! Forward-mode automatic differentiation used by the measurement models.

The same algorithms run on [f64] when only the value of a measurement is needed, and on
[Gradient] when the partial derivatives with respect to the spacecraft states and to the
selected parameters are required. The [Real] trait is the only thing those algorithms know
about their scalar type.
*/

use num::{One, Zero};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

mod derivation;
mod gradient;
mod instant;
pub mod linalg;

pub use derivation::{Derivation, GradientDerivation, NoDerivatives};
pub use gradient::Gradient;
pub use instant::Instant;

/// A real scalar, either a plain `f64` or a value carrying its partial derivatives.
pub trait Real:
    Clone
    + fmt::Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Zero
    + One
{
    /// Builds a value with no dependency on any parameter.
    fn constant(value: f64) -> Self;

    /// Returns the real part of this value.
    fn real(&self) -> f64;

    fn sqrt(self) -> Self;

    fn sin(self) -> Self;

    fn cos(self) -> Self;

    fn asin(self) -> Self;

    /// Four quadrant arc tangent of `self` (the ordinate) and `x` (the abscissa).
    fn atan2(self, x: Self) -> Self;

    fn abs(self) -> Self;

    fn powi(self, n: i32) -> Self;
}

impl Real for f64 {
    fn constant(value: f64) -> Self {
        value
    }

    fn real(&self) -> f64 {
        *self
    }

    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    fn sin(self) -> Self {
        f64::sin(self)
    }

    fn cos(self) -> Self {
        f64::cos(self)
    }

    fn asin(self) -> Self {
        f64::asin(self)
    }

    fn atan2(self, x: Self) -> Self {
        f64::atan2(self, x)
    }

    fn abs(self) -> Self {
        f64::abs(self)
    }

    fn powi(self, n: i32) -> Self {
        f64::powi(self, n)
    }
}
