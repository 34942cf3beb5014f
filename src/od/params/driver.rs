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

use crate::errors::{InvalidParameterSnafu, MeasurementError};
use crate::io::ConfigRepr;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt;

/// A contiguous time span over which a parameter driver holds a single value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValueSpan {
    /// Name of this span, used to identify its partial derivative
    pub name: String,
    /// Start of validity of this span, unbounded in the past if unset
    #[serde(default)]
    pub start: Option<Epoch>,
    /// Physical value of the parameter over this span
    pub value: f64,
}

/// A named scalar which may be estimated, e.g. a station clock offset.
///
/// The value may be piecewise constant in time: the validity of the driver is split in spans, each
/// with its own name and its own value. Each span of a selected driver is estimated independently.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "ParameterDriverRepr")]
pub struct ParameterDriver {
    pub name: String,
    /// Value used as the origin of the normalized value
    pub reference_value: f64,
    /// Scale used to normalize the value, strictly positive
    pub scale: f64,
    pub min_value: f64,
    pub max_value: f64,
    /// Whether this parameter is currently estimated
    selected: bool,
    /// Spans, sorted by start epoch, the first one starts unbounded, never empty
    spans: Vec<ValueSpan>,
}

/// Serialized form of a driver: a driver without spans holds its reference value at all times.
#[derive(Deserialize)]
struct ParameterDriverRepr {
    name: String,
    reference_value: f64,
    scale: f64,
    #[serde(default = "min_default")]
    min_value: f64,
    #[serde(default = "max_default")]
    max_value: f64,
    #[serde(default)]
    selected: bool,
    #[serde(default)]
    spans: Vec<ValueSpan>,
}

impl TryFrom<ParameterDriverRepr> for ParameterDriver {
    type Error = MeasurementError;

    fn try_from(repr: ParameterDriverRepr) -> Result<Self, Self::Error> {
        let mut driver = Self::new(&repr.name, repr.reference_value, repr.scale)
            .with_selected(repr.selected);
        if !repr.spans.is_empty() {
            driver.spans = repr.spans;
        }
        driver.min_value = repr.min_value;
        driver.max_value = repr.max_value;
        driver.validate()?;
        for span in &mut driver.spans {
            span.value = span.value.max(repr.min_value).min(repr.max_value);
        }
        Ok(driver)
    }
}

fn min_default() -> f64 {
    f64::NEG_INFINITY
}

fn max_default() -> f64 {
    f64::INFINITY
}

impl ParameterDriver {
    /// Initializes an unselected and unbounded driver, valid at all times, at its reference value.
    pub fn new(name: &str, reference_value: f64, scale: f64) -> Self {
        Self {
            name: name.to_string(),
            reference_value,
            scale,
            min_value: f64::NEG_INFINITY,
            max_value: f64::INFINITY,
            selected: false,
            spans: vec![ValueSpan {
                name: name.to_string(),
                start: None,
                value: reference_value,
            }],
        }
    }

    /// Returns a copy of this driver with the provided bounds, its values clamped to them.
    pub fn with_bounds(mut self, min_value: f64, max_value: f64) -> Result<Self, MeasurementError> {
        ensure!(
            min_value <= max_value,
            InvalidParameterSnafu {
                name: self.name.clone(),
                reason: format!("empty bounds [{min_value}, {max_value}]"),
            }
        );
        self.min_value = min_value;
        self.max_value = max_value;
        for span in &mut self.spans {
            span.value = span.value.clamp(min_value, max_value);
        }
        Ok(self)
    }

    /// Returns a copy of this driver with the provided selection flag.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// All the spans of this driver, sorted in time
    pub fn spans(&self) -> &[ValueSpan] {
        &self.spans
    }

    /// Position of the span valid at the provided epoch
    fn span_index(&self, epoch: Epoch) -> usize {
        self.spans
            .iter()
            .rposition(|span| span.start.map_or(true, |start| start <= epoch))
            .unwrap_or(0)
    }

    /// Returns the name of the span valid at the provided epoch.
    pub fn span_name_at(&self, epoch: Epoch) -> &str {
        match self.spans.get(self.span_index(epoch)) {
            Some(span) => &span.name,
            None => &self.name,
        }
    }

    /// Returns the physical value of this parameter at the provided epoch.
    pub fn value_at(&self, epoch: Epoch) -> f64 {
        match self.spans.get(self.span_index(epoch)) {
            Some(span) => span.value,
            None => self.reference_value,
        }
    }

    /// Returns the value of the first span, which is the only value of a driver that was never split.
    pub fn value(&self) -> f64 {
        self.spans
            .first()
            .map_or(self.reference_value, |span| span.value)
    }

    /// Sets the value of all of the spans, clamped to the bounds of this driver.
    pub fn set_value(&mut self, value: f64) {
        let value = self.clamp(value);
        for span in &mut self.spans {
            span.value = value;
        }
    }

    /// Sets the value of the span valid at the provided epoch, clamped to the bounds of this driver.
    pub fn set_value_at(&mut self, epoch: Epoch, value: f64) {
        let value = self.clamp(value);
        let idx = self.span_index(epoch);
        self.spans[idx].value = value;
    }

    /// Returns the normalized value at the provided epoch, i.e. `(value - reference) / scale`.
    pub fn normalized_value_at(&self, epoch: Epoch) -> f64 {
        (self.value_at(epoch) - self.reference_value) / self.scale
    }

    /// Sets the value at the provided epoch from its normalized value.
    pub fn set_normalized_value_at(&mut self, epoch: Epoch, normalized: f64) {
        self.set_value_at(epoch, self.reference_value + self.scale * normalized);
    }

    /// Splits the span valid at `epoch` in two, the new span starting at `epoch` with the same value.
    pub fn add_span_at(&mut self, epoch: Epoch) -> Result<(), MeasurementError> {
        let idx = self.span_index(epoch);
        ensure!(
            self.spans[idx].start != Some(epoch),
            InvalidParameterSnafu {
                name: self.name.clone(),
                reason: format!("a span already starts at {epoch}"),
            }
        );
        let span = ValueSpan {
            name: format!("Span{}{epoch}", self.name),
            start: Some(epoch),
            value: self.spans[idx].value,
        };
        self.spans.insert(idx + 1, span);
        Ok(())
    }

    /// Checks the consistency of this driver, e.g. after loading it from a configuration file.
    pub fn validate(&self) -> Result<(), MeasurementError> {
        ensure!(
            self.scale > 0.0,
            InvalidParameterSnafu {
                name: self.name.clone(),
                reason: format!("scale must be strictly positive, got {}", self.scale),
            }
        );
        ensure!(
            self.min_value <= self.max_value,
            InvalidParameterSnafu {
                name: self.name.clone(),
                reason: format!("empty bounds [{}, {}]", self.min_value, self.max_value),
            }
        );
        ensure!(
            self.spans
                .windows(2)
                .all(|pair| match (pair[0].start, pair[1].start) {
                    (None, Some(_)) => true,
                    (Some(a), Some(b)) => a < b,
                    _ => false,
                }),
            InvalidParameterSnafu {
                name: self.name.clone(),
                reason: "spans must be sorted with only the first one unbounded".to_string(),
            }
        );
        Ok(())
    }

    fn clamp(&self, value: f64) -> f64 {
        // Bounds are public, so they may be inverted after validation
        let clamped = value.max(self.min_value).min(self.max_value);
        if clamped != value {
            warn!(
                "{}: value {value} clamped to {clamped} (bounds [{}, {}])",
                self.name, self.min_value, self.max_value
            );
        }
        clamped
    }
}

impl ConfigRepr for ParameterDriver {}

impl fmt::Display for ParameterDriver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} = {} ({} span(s){})",
            self.name,
            self.value(),
            self.spans.len(),
            if self.selected { ", estimated" } else { "" }
        )
    }
}
