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

/*! Theoretical measurement models.

Each model computes the value an observation should have for a given set of spacecraft states.
The computation is written once, generically over [Real], and runs either on `f64` when only the
value is needed, or on [Gradient] to obtain the partial derivatives with respect to the states and
to the selected parameter drivers.
*/

use crate::ad::{Derivation, Gradient, GradientDerivation, NoDerivatives, Real};
use crate::cosmic::{SpacecraftState, TimeStampedPv};
use crate::errors::MeasurementError;
use crate::linalg::{DMatrix, DVector};
use crate::od::params::{ParameterDriver, ParameterIndices, STATE_PARTIALS};
use indexmap::IndexMap;
use rayon::prelude::*;

pub mod angular;
pub mod bistatic;
mod estimated;
pub mod fdoa;
pub mod inter_satellites;
mod observed;
pub mod range;
pub mod rangerate;
pub mod tdoa;
pub mod turn_around;
mod types;

pub use angular::{AngularAzEl, AngularRaDec, RaDecReference};
pub use bistatic::{BistaticRange, BistaticRangeRate};
pub use estimated::{EstimatedMeasurement, EstimatedMeasurementBase, EstimationStatus};
pub use fdoa::Fdoa;
pub use inter_satellites::{InterSatellitesOneWayRangeRate, InterSatellitesRange};
pub use observed::ObservedMeasurement;
pub use range::Range;
pub use rangerate::RangeRate;
pub use tdoa::Tdoa;
pub use turn_around::TurnAroundRange;
pub use types::MeasurementType;

/// Description of a measurement, independent of the way it is evaluated.
pub trait Measurement: Send + Sync {
    fn observed(&self) -> &ObservedMeasurement;

    fn measurement_type(&self) -> MeasurementType;

    /// Number of satellites involved in this kind of measurement
    fn satellite_count(&self) -> usize {
        1
    }

    /// Drivers of the observers involved, then of the satellites involved.
    fn parameter_drivers(&self) -> Vec<&ParameterDriver>;
}

/// Theoretical values of a measurement and the supporting geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Theoretical<T: Real> {
    pub values: Vec<T>,
    pub transit_states: Vec<SpacecraftState>,
    pub participants: Vec<TimeStampedPv<f64>>,
}

/// A measurement whose theoretical value is computed by a single algorithm over any [Real].
pub trait TheoreticalEvaluation: Measurement {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError>;
}

/// The interface consumed by an estimator.
pub trait MeasurementModel: Measurement {
    /// Computes the theoretical value only, e.g. to check convergence or reject outliers.
    fn evaluate_without_derivatives(
        &self,
        iteration: usize,
        count: usize,
        states: &[SpacecraftState],
    ) -> Result<EstimatedMeasurementBase, MeasurementError>;

    /// Computes the theoretical value and its partial derivatives with respect to the position and
    /// velocity of each state and to each span of the selected parameter drivers.
    fn evaluate(
        &self,
        iteration: usize,
        count: usize,
        states: &[SpacecraftState],
    ) -> Result<EstimatedMeasurement, MeasurementError>;
}

impl<M: TheoreticalEvaluation> MeasurementModel for M {
    fn evaluate_without_derivatives(
        &self,
        iteration: usize,
        count: usize,
        states: &[SpacecraftState],
    ) -> Result<EstimatedMeasurementBase, MeasurementError> {
        let kind = self.measurement_type();
        self.observed().check(kind, self.satellite_count(), states)?;

        let theoretical = self.theoretical::<f64, _>(states, &NoDerivatives)?;
        Ok(EstimatedMeasurementBase::new(
            iteration,
            count,
            kind,
            self.observed(),
            theoretical.values,
            theoretical.transit_states,
            theoretical.participants,
        ))
    }

    fn evaluate(
        &self,
        iteration: usize,
        count: usize,
        states: &[SpacecraftState],
    ) -> Result<EstimatedMeasurement, MeasurementError> {
        let kind = self.measurement_type();
        self.observed().check(kind, self.satellite_count(), states)?;

        // Rebuilt on every call: the selection may change between two iterations.
        let drivers = self.parameter_drivers();
        let indices = ParameterIndices::build(states.len(), drivers.iter().copied());
        let theoretical =
            self.theoretical::<Gradient, _>(states, &GradientDerivation::new(&indices))?;
        let values = &theoretical.values;

        let state_derivatives = (0..states.len())
            .map(|k| {
                let first = ParameterIndices::state_offset(k);
                DMatrix::from_fn(values.len(), STATE_PARTIALS, |i, j| {
                    values[i].partial(first + j)
                })
            })
            .collect();

        let mut parameter_derivatives = IndexMap::new();
        for driver in drivers.iter().filter(|driver| driver.is_selected()) {
            for span in driver.spans() {
                if let Some(index) = indices.index_of(&span.name) {
                    parameter_derivatives
                        .entry(span.name.clone())
                        .or_insert_with(|| {
                            DVector::from_iterator(
                                values.len(),
                                values.iter().map(|value| value.partial(index)),
                            )
                        });
                }
            }
        }

        let base = EstimatedMeasurementBase::new(
            iteration,
            count,
            kind,
            self.observed(),
            values.iter().map(|value| value.real()).collect(),
            theoretical.transit_states,
            theoretical.participants,
        );
        Ok(EstimatedMeasurement {
            base,
            state_derivatives,
            parameter_derivatives,
        })
    }
}

/// Evaluates many measurements in parallel against the same states.
///
/// Each evaluation builds its own parameter axis, so measurements of different kinds and with
/// different selected parameters may be mixed freely.
pub fn evaluate_batch(
    models: &[Box<dyn MeasurementModel>],
    iteration: usize,
    count: usize,
    states: &[SpacecraftState],
) -> Vec<Result<EstimatedMeasurement, MeasurementError>> {
    models
        .par_iter()
        .map(|model| model.evaluate(iteration, count, states))
        .collect()
}
