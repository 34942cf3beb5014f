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

use super::{Measurement, MeasurementType, ObservedMeasurement, Theoretical, TheoreticalEvaluation};
use crate::ad::linalg::{dot, norm, sub};
use crate::ad::{Derivation, Real};
use crate::cosmic::SpacecraftState;
use crate::errors::{FrameMismatchSnafu, MeasurementError};
use crate::od::ground_station::GroundStation;
use crate::od::observer::{ObservableSatellite, Observer};
use crate::od::params::ParameterDriver;
use crate::od::signal::{observer_receiver, TravelTimeSolver};
use crate::time::Epoch;
use crate::utils::normalize_angle;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;

/// Wraps `angle` within π of `center`, keeping its partials.
pub(crate) fn wrapped_around<T: Real>(angle: T, center: f64) -> T {
    let value = angle.real();
    angle + (normalize_angle(value, center) - value)
}

/// Azimuth and elevation of a satellite as seen from a ground station, in radians.
///
/// The azimuth is counted clockwise from the local north towards the east and is wrapped around
/// the observed azimuth.
#[derive(Clone, Debug, PartialEq)]
pub struct AngularAzEl {
    pub observed: ObservedMeasurement,
    pub station: GroundStation,
    pub solver: TravelTimeSolver,
}

impl AngularAzEl {
    pub fn new(
        station: GroundStation,
        epoch: Epoch,
        azimuth_rad: f64,
        elevation_rad: f64,
        sigma_rad: [f64; 2],
        base_weight: [f64; 2],
        satellite: ObservableSatellite,
    ) -> Result<Self, MeasurementError> {
        Ok(Self {
            observed: ObservedMeasurement::new(
                epoch,
                vec![azimuth_rad, elevation_rad],
                sigma_rad.to_vec(),
                base_weight.to_vec(),
                vec![satellite],
            )?,
            station,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for AngularAzEl {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        MeasurementType::AzEl
    }

    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.station.parameter_drivers();
        drivers.extend(self.observed.satellite_drivers());
        drivers
    }
}

impl TheoreticalEvaluation for AngularAzEl {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        let common = observer_receiver(
            &self.solver,
            &self.station,
            &self.observed.satellites[0],
            self.observed.epoch,
            false,
            states,
            d,
        )?;

        let [east, north, zenith] =
            self.station
                .topocentric_axes_in(&common.arrival, common.state.frame, d)?;
        let los = sub(&common.emitter_pv.position, &common.receiver_pv.position);

        let azimuth = wrapped_around(
            dot(&los, &east).atan2(dot(&los, &north)),
            self.observed.observed[0],
        );
        let elevation = (dot(&los, &zenith) / norm(&los)).asin();

        Ok(Theoretical {
            values: vec![azimuth, elevation],
            transit_states: vec![common.transit_state.clone()],
            participants: vec![common.emitter(), common.receiver()],
        })
    }
}

/// Frame in which the right ascension and declination are expressed.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RaDecReference {
    /// The frame of the spacecraft states
    #[default]
    StateFrame,
    /// The body-fixed frame of the observing station
    BodyFixed,
}

/// Right ascension and declination of a satellite as seen from a ground station, in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct AngularRaDec {
    pub observed: ObservedMeasurement,
    pub station: GroundStation,
    pub reference: RaDecReference,
    pub solver: TravelTimeSolver,
}

impl AngularRaDec {
    pub fn new(
        station: GroundStation,
        reference: RaDecReference,
        epoch: Epoch,
        right_ascension_rad: f64,
        declination_rad: f64,
        sigma_rad: [f64; 2],
        base_weight: [f64; 2],
        satellite: ObservableSatellite,
    ) -> Result<Self, MeasurementError> {
        Ok(Self {
            observed: ObservedMeasurement::new(
                epoch,
                vec![right_ascension_rad, declination_rad],
                sigma_rad.to_vec(),
                base_weight.to_vec(),
                vec![satellite],
            )?,
            station,
            reference,
            solver: TravelTimeSolver::default(),
        })
    }

    pub fn with_solver(mut self, solver: TravelTimeSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Measurement for AngularRaDec {
    fn observed(&self) -> &ObservedMeasurement {
        &self.observed
    }

    fn measurement_type(&self) -> MeasurementType {
        MeasurementType::RaDec
    }

    fn parameter_drivers(&self) -> Vec<&ParameterDriver> {
        let mut drivers = self.station.parameter_drivers();
        drivers.extend(self.observed.satellite_drivers());
        drivers
    }
}

impl TheoreticalEvaluation for AngularRaDec {
    fn theoretical<T: Real, D: Derivation<T>>(
        &self,
        states: &[SpacecraftState],
        d: &D,
    ) -> Result<Theoretical<T>, MeasurementError> {
        let common = observer_receiver(
            &self.solver,
            &self.station,
            &self.observed.satellites[0],
            self.observed.epoch,
            false,
            states,
            d,
        )?;
        let frame = common.state.frame;
        let los = sub(&common.emitter_pv.position, &common.receiver_pv.position);

        let los = match self.reference {
            RaDecReference::StateFrame => los,
            RaDecReference::BodyFixed if frame == self.station.rotation.body_fixed => los,
            RaDecReference::BodyFixed => {
                ensure!(
                    frame == self.station.rotation.inertial,
                    FrameMismatchSnafu {
                        action: "expressing a line of sight in the body-fixed frame",
                        expected: self.station.rotation.inertial,
                        got: frame,
                    }
                );
                let offsets = self.station.orientation_offsets(&common.arrival, d);
                self.station
                    .rotation
                    .direction_to_body_fixed(&common.arrival, &los, &offsets)
            }
        };

        let right_ascension = wrapped_around(
            los[1].clone().atan2(los[0].clone()),
            self.observed.observed[0],
        );
        let declination = (los[2].clone() / norm(&los)).asin();

        Ok(Theoretical {
            values: vec![right_ascension, declination],
            transit_states: vec![common.transit_state.clone()],
            participants: vec![common.emitter(), common.receiver()],
        })
    }
}
