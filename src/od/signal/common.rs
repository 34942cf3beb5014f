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

use super::TravelTimeSolver;
use crate::ad::{Derivation, Instant, Real};
use crate::cosmic::{PvCoordinates, SpacecraftState, TimeStampedPv};
use crate::errors::MeasurementError;
use crate::od::clock::ClockOffset;
use crate::od::observer::{ObservableSatellite, Observer, ObserverProvider};
use crate::od::params::ParameterIndices;
use crate::time::Epoch;

/// The self consistent geometry of a one way signal between a satellite and an observer.
///
/// The receiver is the observer for [observer_receiver] and the satellite for
/// [satellite_receiver]. All coordinates are expressed in the frame of the satellite state.
#[derive(Clone, Debug, PartialEq)]
pub struct CommonParameters<T: Real> {
    /// State of the satellite as provided
    pub state: SpacecraftState,
    /// State of the satellite shifted to its own participation in the signal
    pub transit_state: SpacecraftState,
    /// Delay between emission and arrival
    pub tau_d: T,
    /// Reception date, corrected for the receiver clock offset
    pub arrival: Instant<T>,
    pub emission: Instant<T>,
    /// Receiver clock offset at the nominal measurement date
    pub receiver_clock: ClockOffset<T>,
    /// Emitter clock offset at the emission date
    pub emitter_clock: ClockOffset<T>,
    pub receiver_pv: PvCoordinates<T>,
    pub emitter_pv: PvCoordinates<T>,
}

impl<T: Real> CommonParameters<T> {
    /// Solves the leg of a round trip signal which left the receiver and reached the emitter at
    /// the emission, the receiver coordinates being extrapolated from the arrival.
    ///
    /// Returns the uplink delay and the receiver coordinates at the departure of the round trip.
    pub fn round_trip_uplink(
        &self,
        solver: &TravelTimeSolver,
    ) -> Result<(T, PvCoordinates<T>), MeasurementError> {
        let frame = self.state.frame;
        let receiver = TimeStampedPv::new(self.arrival.clone(), frame, self.receiver_pv.clone());
        let tau_u = solver
            .adjustable_emitter(&receiver)
            .delay(&self.emitter_pv.position, &self.emission, frame)?
            .delay;
        let departure = self
            .receiver_pv
            .shifted_by(&-(self.tau_d.clone() + tau_u.clone()));
        Ok((tau_u, departure))
    }

    /// Coordinates of the receiver at the arrival
    pub fn receiver(&self) -> TimeStampedPv<f64> {
        TimeStampedPv::new(
            self.arrival.to_real(),
            self.state.frame,
            self.receiver_pv.to_real(),
        )
    }

    /// Coordinates of the emitter at the emission
    pub fn emitter(&self) -> TimeStampedPv<f64> {
        TimeStampedPv::new(
            self.emission.to_real(),
            self.state.frame,
            self.emitter_pv.to_real(),
        )
    }
}

/// Date of reception of a signal time tagged at `epoch` by a receiver whose clock offset is `clock`.
fn arrival_date<T: Real>(
    epoch: Epoch,
    clock: &ClockOffset<T>,
    clock_offset_applied: bool,
) -> Instant<T> {
    if clock_offset_applied {
        Instant::at(epoch)
    } else {
        Instant::at(epoch).shifted_by(-clock.offset_s.clone())
    }
}

/// Builds the geometry of a signal emitted (or reflected) by `satellite` and received by `observer` at `epoch`.
///
/// If `clock_offset_applied` is set, `epoch` is already the true reception date, otherwise the
/// observer clock offset is removed from it.
pub fn observer_receiver<T, D, O>(
    solver: &TravelTimeSolver,
    observer: &O,
    satellite: &ObservableSatellite,
    epoch: Epoch,
    clock_offset_applied: bool,
    states: &[SpacecraftState],
    d: &D,
) -> Result<CommonParameters<T>, MeasurementError>
where
    T: Real,
    D: Derivation<T>,
    O: Observer,
{
    let state = satellite.state(states)?;
    let frame = state.frame;

    let receiver_clock = observer.clock_offset_at(&Instant::at(epoch), d);
    let arrival = arrival_date(epoch, &receiver_clock, clock_offset_applied);
    let receiver_pv = observer.pv_at(&arrival, frame, states, d)?;

    // Satellite coordinates at the arrival, then light time back to its emission
    let delta = arrival.seconds_since(state.epoch);
    let pv = PvCoordinates::from_state(state, ParameterIndices::state_offset(satellite.index), d);
    let downlink = TimeStampedPv::new(arrival.clone(), frame, pv.shifted_by(&delta));
    let tau_d = solver
        .adjustable_emitter(&downlink)
        .delay(&receiver_pv.position, &arrival, frame)?
        .delay;

    let delta_m_tau_d = delta - tau_d.clone();
    let emission = arrival.shifted_by(-tau_d.clone());
    let emitter_clock = satellite.clock_offset_at(&emission, d);

    Ok(CommonParameters {
        state: state.clone(),
        transit_state: state.shifted_by(delta_m_tau_d.real()),
        tau_d,
        arrival,
        emission,
        receiver_clock,
        emitter_clock,
        receiver_pv,
        emitter_pv: pv.shifted_by(&delta_m_tau_d),
    })
}

/// Builds the geometry of a signal emitted by `remote` and received by the `local` satellite at `epoch`.
///
/// The remote observer may itself be a satellite, in which case the partials flow into both states.
pub fn satellite_receiver<T, D, O>(
    solver: &TravelTimeSolver,
    local: &ObservableSatellite,
    remote: &O,
    epoch: Epoch,
    clock_offset_applied: bool,
    states: &[SpacecraftState],
    d: &D,
) -> Result<CommonParameters<T>, MeasurementError>
where
    T: Real,
    D: Derivation<T>,
    O: Observer,
{
    let state = local.state(states)?;
    let frame = state.frame;

    let receiver_clock = local.clock_offset_at(&Instant::at(epoch), d);
    let arrival = arrival_date(epoch, &receiver_clock, clock_offset_applied);

    let delta = arrival.seconds_since(state.epoch);
    let receiver_pv =
        PvCoordinates::from_state(state, ParameterIndices::state_offset(local.index), d)
            .shifted_by(&delta);

    let provider = ObserverProvider::new(remote, states, d);
    let tau_d = solver
        .adjustable_emitter(&provider)
        .delay(&receiver_pv.position, &arrival, frame)?
        .delay;

    let emission = arrival.shifted_by(-tau_d.clone());
    let emitter_pv = remote.pv_at(&emission, frame, states, d)?;
    let emitter_clock = remote.clock_offset_at(&emission, d);

    Ok(CommonParameters {
        state: state.clone(),
        transit_state: state.shifted_by(delta.real()),
        tau_d,
        arrival,
        emission,
        receiver_clock,
        emitter_clock,
        receiver_pv,
        emitter_pv,
    })
}
