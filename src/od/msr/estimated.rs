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

use super::{MeasurementType, ObservedMeasurement};
use crate::cosmic::{SpacecraftState, TimeStampedPv};
use crate::linalg::{DMatrix, DVector};
use crate::time::Epoch;
use indexmap::IndexMap;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimationStatus {
    Processed,
    /// The observation is disabled, it must not contribute to the estimation
    Rejected,
}

/// Theoretical value of a measurement, without partial derivatives.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimatedMeasurementBase {
    /// Iteration of the estimator which requested this evaluation
    pub iteration: usize,
    /// Evaluation counter of the estimator
    pub count: usize,
    pub epoch: Epoch,
    pub kind: MeasurementType,
    pub status: EstimationStatus,
    /// States of the satellites at the instants they took part in the signal path
    pub transit_states: Vec<SpacecraftState>,
    /// Coordinates of each participant of the signal path, in time order
    pub participants: Vec<TimeStampedPv<f64>>,
    pub estimated: Vec<f64>,
    pub observed: Vec<f64>,
    pub sigma: Vec<f64>,
    pub base_weight: Vec<f64>,
}

impl EstimatedMeasurementBase {
    pub(crate) fn new(
        iteration: usize,
        count: usize,
        kind: MeasurementType,
        observed: &ObservedMeasurement,
        estimated: Vec<f64>,
        transit_states: Vec<SpacecraftState>,
        participants: Vec<TimeStampedPv<f64>>,
    ) -> Self {
        Self {
            iteration,
            count,
            epoch: observed.epoch,
            kind,
            status: if observed.enabled {
                EstimationStatus::Processed
            } else {
                EstimationStatus::Rejected
            },
            transit_states,
            participants,
            estimated,
            observed: observed.observed.clone(),
            sigma: observed.sigma.clone(),
            base_weight: observed.base_weight.clone(),
        }
    }

    /// Observed minus estimated
    pub fn residuals(&self) -> Vec<f64> {
        self.observed
            .iter()
            .zip(&self.estimated)
            .map(|(obs, est)| obs - est)
            .collect()
    }

    /// Residuals scaled by their base weight and divided by their standard deviation
    pub fn weighted_residuals(&self) -> Vec<f64> {
        self.residuals()
            .iter()
            .zip(self.base_weight.iter().zip(&self.sigma))
            .map(|(residual, (weight, sigma))| residual * weight / sigma)
            .collect()
    }

    pub fn is_processed(&self) -> bool {
        self.status == EstimationStatus::Processed
    }
}

impl fmt::Display for EstimatedMeasurementBase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} @ {}: estimated {:?}, observed {:?} ({:?})",
            self.kind, self.count, self.epoch, self.estimated, self.observed, self.status
        )
    }
}

/// Theoretical value of a measurement and its partial derivatives.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimatedMeasurement {
    pub base: EstimatedMeasurementBase,
    /// For each state, a dimension × 6 matrix of the partials with respect to its position and velocity
    pub state_derivatives: Vec<DMatrix<f64>>,
    /// Partials with respect to each selected parameter span, keyed by span name
    pub parameter_derivatives: IndexMap<String, DVector<f64>>,
}

impl EstimatedMeasurement {
    pub fn estimated(&self) -> &[f64] {
        &self.base.estimated
    }

    /// Partials of the measurement with respect to the provided span, if it was selected
    pub fn parameter_derivative(&self, span_name: &str) -> Option<&DVector<f64>> {
        self.parameter_derivatives.get(span_name)
    }
}

impl fmt::Display for EstimatedMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} with {} parameter partial(s)",
            self.base,
            self.parameter_derivatives.len()
        )
    }
}
