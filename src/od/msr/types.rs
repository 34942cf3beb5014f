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

use serde_derive::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, Hash, Serialize, Deserialize, PartialEq, Eq)]
pub enum MeasurementType {
    #[serde(rename = "range_km")]
    Range,
    #[serde(rename = "two_way_range_km")]
    TwoWayRange,
    #[serde(rename = "range_rate_km_s")]
    RangeRate,
    #[serde(rename = "two_way_range_rate_km_s")]
    TwoWayRangeRate,
    #[serde(rename = "azimuth_elevation_rad")]
    AzEl,
    #[serde(rename = "right_ascension_declination_rad")]
    RaDec,
    #[serde(rename = "tdoa_s")]
    Tdoa,
    #[serde(rename = "fdoa_hz")]
    Fdoa,
    #[serde(rename = "bistatic_range_km")]
    BistaticRange,
    #[serde(rename = "bistatic_range_rate_km_s")]
    BistaticRangeRate,
    #[serde(rename = "turn_around_range_km")]
    TurnAroundRange,
    #[serde(rename = "inter_satellites_range_km")]
    InterSatellitesRange,
    #[serde(rename = "inter_satellites_two_way_range_km")]
    InterSatellitesTwoWayRange,
    #[serde(rename = "inter_satellites_range_rate_km_s")]
    InterSatellitesRangeRate,
}

impl MeasurementType {
    /// Returns the expected unit of this measurement type
    pub fn unit(self) -> &'static str {
        match self {
            Self::Range
            | Self::TwoWayRange
            | Self::BistaticRange
            | Self::TurnAroundRange
            | Self::InterSatellitesRange
            | Self::InterSatellitesTwoWayRange => "km",
            Self::RangeRate
            | Self::TwoWayRangeRate
            | Self::BistaticRangeRate
            | Self::InterSatellitesRangeRate => "km/s",
            Self::AzEl | Self::RaDec => "rad",
            Self::Tdoa => "s",
            Self::Fdoa => "Hz",
        }
    }

    /// Number of scalar values of this measurement type
    pub fn dimension(self) -> usize {
        match self {
            Self::AzEl | Self::RaDec => 2,
            _ => 1,
        }
    }

    /// Returns whether the first value of this measurement type is an angle defined modulo 2π.
    pub fn is_angular(self) -> bool {
        matches!(self, Self::AzEl | Self::RaDec)
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?} ({})", self.unit())
    }
}
