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

use super::ParameterDriver;
use indexmap::IndexMap;

/// Number of partials per spacecraft state: position and velocity.
pub const STATE_PARTIALS: usize = 6;

/// Maps the name of each selected parameter span to its position on the partial derivatives axis.
///
/// The first `6 × n_states` positions are reserved for the Cartesian position and velocity of each
/// spacecraft state involved in a measurement, in the order of the states. Parameter spans follow,
/// in the order of the drivers. Spans sharing a name (e.g. an Earth orientation parameter seen by
/// two stations) share a single position.
///
/// The selection of parameters may change between two iterations of an estimator, so these
/// indices are rebuilt for each evaluation and must never be cached.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterIndices {
    n_states: usize,
    spans: IndexMap<String, usize>,
}

impl ParameterIndices {
    /// Builds the indices for `n_states` spacecraft states and the provided drivers.
    /// Drivers which are not selected are ignored.
    pub fn build<'a, I>(n_states: usize, drivers: I) -> Self
    where
        I: IntoIterator<Item = &'a ParameterDriver>,
    {
        let mut spans = IndexMap::new();
        let mut next = STATE_PARTIALS * n_states;
        for driver in drivers {
            if !driver.is_selected() {
                continue;
            }
            for span in driver.spans() {
                if !spans.contains_key(&span.name) {
                    spans.insert(span.name.clone(), next);
                    next += 1;
                }
            }
        }
        debug!(
            "{} selected parameter span(s) after {} state partials",
            spans.len(),
            STATE_PARTIALS * n_states
        );
        Self { n_states, spans }
    }

    /// Number of spacecraft states on the axis
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Position of the first partial of the k-th state
    pub fn state_offset(k: usize) -> usize {
        STATE_PARTIALS * k
    }

    /// Total size of the partial derivatives axis
    pub fn free_parameters(&self) -> usize {
        STATE_PARTIALS * self.n_states + self.spans.len()
    }

    /// Position of the provided span name, if it is selected
    pub fn index_of(&self, span_name: &str) -> Option<usize> {
        self.spans.get(span_name).copied()
    }

    /// Number of selected parameter spans
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterates over the span names and their positions, in axis order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.spans.iter().map(|(name, idx)| (name.as_str(), *idx))
    }
}
