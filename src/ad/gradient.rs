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

use super::Real;
use crate::linalg::DVector;
use num::{One, Zero};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A value and its first order partial derivatives with respect to a parameter axis.
///
/// The parameter axis is sized at runtime: it holds six components per spacecraft state involved
/// in a measurement followed by one component per selected parameter span. A gradient with an
/// empty partial vector is a constant and combines with gradients of any size. Combining two
/// non-constant gradients of different sizes is a programming error and panics.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    value: f64,
    partials: DVector<f64>,
}

impl Gradient {
    /// Initializes a gradient from its value and its partials.
    pub fn new(value: f64, partials: DVector<f64>) -> Self {
        Self { value, partials }
    }

    /// Initializes the independent variable at `index` of an axis of `free_parameters` partials.
    pub fn variable(free_parameters: usize, index: usize, value: f64) -> Self {
        assert!(
            index < free_parameters,
            "variable index {index} outside of an axis of {free_parameters} parameters"
        );
        let mut partials = DVector::zeros(free_parameters);
        partials[index] = 1.0;
        Self { value, partials }
    }

    /// Returns the value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the full vector of partials (empty for a constant)
    pub fn partials(&self) -> &DVector<f64> {
        &self.partials
    }

    /// Returns the partial with respect to the parameter at `index`, zero for constants.
    pub fn partial(&self, index: usize) -> f64 {
        if index < self.partials.len() {
            self.partials[index]
        } else {
            0.0
        }
    }

    /// Number of parameters on the axis of this gradient (zero for constants)
    pub fn free_parameters(&self) -> usize {
        self.partials.len()
    }

    pub fn is_constant(&self) -> bool {
        self.partials.is_empty()
    }

    /// Applies a univariate function of value `value` and derivative `derivative` at `self.value`.
    fn compose(&self, value: f64, derivative: f64) -> Self {
        Self {
            value,
            partials: &self.partials * derivative,
        }
    }
}

/// Computes `ka * a + kb * b`, treating an empty vector as the partials of a constant.
fn combine(a: &DVector<f64>, ka: f64, b: &DVector<f64>, kb: f64) -> DVector<f64> {
    match (a.len(), b.len()) {
        (0, 0) => DVector::zeros(0),
        (0, _) => b * kb,
        (_, 0) => a * ka,
        (n, m) => {
            assert_eq!(
                n, m,
                "gradients defined over different parameter axes ({n} vs {m} parameters)"
            );
            a * ka + b * kb
        }
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ∂{:?}", self.value, self.partials.as_slice())
    }
}

impl Add for Gradient {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
            partials: combine(&self.partials, 1.0, &rhs.partials, 1.0),
        }
    }
}

impl Sub for Gradient {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
            partials: combine(&self.partials, 1.0, &rhs.partials, -1.0),
        }
    }
}

impl Mul for Gradient {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            value: self.value * rhs.value,
            partials: combine(&self.partials, rhs.value, &rhs.partials, self.value),
        }
    }
}

impl Div for Gradient {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let inv = 1.0 / rhs.value;
        let value = self.value * inv;
        Self {
            value,
            partials: combine(&self.partials, inv, &rhs.partials, -value * inv),
        }
    }
}

impl Neg for Gradient {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            value: -self.value,
            partials: -self.partials,
        }
    }
}

impl Add<f64> for Gradient {
    type Output = Self;

    fn add(mut self, rhs: f64) -> Self {
        self.value += rhs;
        self
    }
}

impl Sub<f64> for Gradient {
    type Output = Self;

    fn sub(mut self, rhs: f64) -> Self {
        self.value -= rhs;
        self
    }
}

impl Mul<f64> for Gradient {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            value: self.value * rhs,
            partials: self.partials * rhs,
        }
    }
}

impl Div<f64> for Gradient {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self * (1.0 / rhs)
    }
}

impl AddAssign for Gradient {
    fn add_assign(&mut self, rhs: Self) {
        self.partials = combine(&self.partials, 1.0, &rhs.partials, 1.0);
        self.value += rhs.value;
    }
}

impl SubAssign for Gradient {
    fn sub_assign(&mut self, rhs: Self) {
        self.partials = combine(&self.partials, 1.0, &rhs.partials, -1.0);
        self.value -= rhs.value;
    }
}

impl MulAssign for Gradient {
    fn mul_assign(&mut self, rhs: Self) {
        self.partials = combine(&self.partials, rhs.value, &rhs.partials, self.value);
        self.value *= rhs.value;
    }
}

impl DivAssign for Gradient {
    fn div_assign(&mut self, rhs: Self) {
        let inv = 1.0 / rhs.value;
        let value = self.value * inv;
        self.partials = combine(&self.partials, inv, &rhs.partials, -value * inv);
        self.value = value;
    }
}

impl Zero for Gradient {
    fn zero() -> Self {
        Self::constant(0.0)
    }

    fn is_zero(&self) -> bool {
        self.value == 0.0 && self.partials.iter().all(|p| *p == 0.0)
    }
}

impl One for Gradient {
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl Real for Gradient {
    fn constant(value: f64) -> Self {
        Self {
            value,
            partials: DVector::zeros(0),
        }
    }

    fn real(&self) -> f64 {
        self.value
    }

    fn sqrt(self) -> Self {
        let root = self.value.sqrt();
        self.compose(root, 0.5 / root)
    }

    fn sin(self) -> Self {
        self.compose(self.value.sin(), self.value.cos())
    }

    fn cos(self) -> Self {
        self.compose(self.value.cos(), -self.value.sin())
    }

    fn asin(self) -> Self {
        self.compose(
            self.value.asin(),
            1.0 / (1.0 - self.value * self.value).sqrt(),
        )
    }

    fn atan2(self, x: Self) -> Self {
        let r2 = self.value * self.value + x.value * x.value;
        Self {
            value: self.value.atan2(x.value),
            partials: combine(&self.partials, x.value / r2, &x.partials, -self.value / r2),
        }
    }

    fn abs(self) -> Self {
        if self.value < 0.0 {
            -self
        } else {
            self
        }
    }

    fn powi(self, n: i32) -> Self {
        self.compose(
            self.value.powi(n),
            f64::from(n) * self.value.powi(n - 1),
        )
    }
}
