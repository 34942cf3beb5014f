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

use super::MeasurementType;
use crate::cosmic::SpacecraftState;
use crate::errors::{InvalidMeasurementSnafu, MeasurementError, StateCountSnafu};
use crate::io::{epoch_from_str, epoch_to_str};
use crate::od::observer::ObservableSatellite;
use crate::od::params::ParameterDriver;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt;

fn enabled_default() -> bool {
    true
}

/// What was actually measured, and how much it should be trusted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservedMeasurement {
    /// Date of the measurement, as tagged by the receiver clock
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub epoch: Epoch,
    pub observed: Vec<f64>,
    /// Theoretical standard deviation of each value
    pub sigma: Vec<f64>,
    pub base_weight: Vec<f64>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    /// Satellites involved, each referring to its position in the list of states
    pub satellites: Vec<ObservableSatellite>,
}

impl ObservedMeasurement {
    /// Initializes an enabled observation after checking the consistency of its dimensions.
    pub fn new(
        epoch: Epoch,
        observed: Vec<f64>,
        sigma: Vec<f64>,
        base_weight: Vec<f64>,
        satellites: Vec<ObservableSatellite>,
    ) -> Result<Self, MeasurementError> {
        let me = Self {
            epoch,
            observed,
            sigma,
            base_weight,
            enabled: true,
            satellites,
        };
        me.validate()?;
        Ok(me)
    }

    /// Initializes a scalar observation of a single satellite
    pub fn scalar(
        epoch: Epoch,
        observed: f64,
        sigma: f64,
        base_weight: f64,
        satellite: ObservableSatellite,
    ) -> Result<Self, MeasurementError> {
        Self::new(epoch, vec![observed], vec![sigma], vec![base_weight], vec![satellite])
    }

    pub fn dimension(&self) -> usize {
        self.observed.len()
    }

    pub fn validate(&self) -> Result<(), MeasurementError> {
        ensure!(
            !self.observed.is_empty(),
            InvalidMeasurementSnafu {
                epoch: self.epoch,
                reason: "no observed value",
            }
        );
        ensure!(
            self.sigma.len() == self.observed.len()
                && self.base_weight.len() == self.observed.len(),
            InvalidMeasurementSnafu {
                epoch: self.epoch,
                reason: format!(
                    "{} observed value(s) but {} sigma(s) and {} weight(s)",
                    self.observed.len(),
                    self.sigma.len(),
                    self.base_weight.len()
                ),
            }
        );
        ensure!(
            self.sigma.iter().all(|sigma| *sigma > 0.0),
            InvalidMeasurementSnafu {
                epoch: self.epoch,
                reason: "standard deviations must be strictly positive",
            }
        );
        ensure!(
            !self.satellites.is_empty(),
            InvalidMeasurementSnafu {
                epoch: self.epoch,
                reason: "no satellite involved",
            }
        );
        Ok(())
    }

    /// Checks that this observation can be evaluated as `kind` with the provided states.
    pub fn check(
        &self,
        kind: MeasurementType,
        satellites: usize,
        states: &[SpacecraftState],
    ) -> Result<(), MeasurementError> {
        ensure!(
            self.dimension() == kind.dimension(),
            InvalidMeasurementSnafu {
                epoch: self.epoch,
                reason: format!(
                    "{kind} has {} value(s), got {}",
                    kind.dimension(),
                    self.dimension()
                ),
            }
        );
        ensure!(
            self.satellites.len() == satellites,
            InvalidMeasurementSnafu {
                epoch: self.epoch,
                reason: format!(
                    "{kind} involves {satellites} satellite(s), got {}",
                    self.satellites.len()
                ),
            }
        );
        let need = self
            .satellites
            .iter()
            .map(|sat| sat.index + 1)
            .max()
            .unwrap_or(0);
        ensure!(
            states.len() >= need,
            StateCountSnafu {
                kind,
                need,
                got: states.len(),
            }
        );
        Ok(())
    }

    /// Clock drivers of the satellites involved, in satellite order
    pub fn satellite_drivers(&self) -> Vec<&ParameterDriver> {
        self.satellites
            .iter()
            .flat_map(|sat| sat.clock.drivers())
            .collect()
    }
}

impl fmt::Display for ObservedMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {:?} (σ = {:?}){}",
            self.epoch,
            self.observed,
            self.sigma,
            if self.enabled { "" } else { " [disabled]" }
        )
    }
}
