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

use super::{Gradient, Real};
use crate::od::params::{ParameterDriver, ParameterIndices};
use crate::time::Epoch;

/// Defines how the inputs of a measurement model become scalars of type `T`.
///
/// The value-only path uses [NoDerivatives] and works on `f64`, the differentiated path uses
/// [GradientDerivation] and works on [Gradient]. The measurement algorithms are written once,
/// generically over this trait.
pub trait Derivation<T: Real> {
    /// Converts a Cartesian component of a spacecraft state, `index` being its position on the parameter axis.
    fn state_component(&self, value: f64, index: usize) -> T;

    /// Returns the value of the driver at the provided epoch.
    fn driver_value(&self, driver: &ParameterDriver, epoch: Epoch) -> T;
}

/// Plain evaluation, no partial derivatives.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDerivatives;

impl Derivation<f64> for NoDerivatives {
    fn state_component(&self, value: f64, _index: usize) -> f64 {
        value
    }

    fn driver_value(&self, driver: &ParameterDriver, epoch: Epoch) -> f64 {
        driver.value_at(epoch)
    }
}

/// Evaluation with partials over the axis defined by a set of parameter indices.
#[derive(Copy, Clone, Debug)]
pub struct GradientDerivation<'a> {
    pub indices: &'a ParameterIndices,
}

impl<'a> GradientDerivation<'a> {
    pub fn new(indices: &'a ParameterIndices) -> Self {
        Self { indices }
    }
}

impl Derivation<Gradient> for GradientDerivation<'_> {
    fn state_component(&self, value: f64, index: usize) -> Gradient {
        Gradient::variable(self.indices.free_parameters(), index, value)
    }

    fn driver_value(&self, driver: &ParameterDriver, epoch: Epoch) -> Gradient {
        let value = driver.value_at(epoch);
        if driver.is_selected() {
            if let Some(index) = self.indices.index_of(driver.span_name_at(epoch)) {
                return Gradient::variable(self.indices.free_parameters(), index, value);
            }
        }
        Gradient::constant(value)
    }
}
