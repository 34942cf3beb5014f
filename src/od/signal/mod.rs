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

/*! Light time: the delay a signal takes to travel between a moving point and a fixed point.

The delay is the solution of `delay = |fixed - moving(t0 + shift(delay))| / c`, found by fixed point
iteration. The emitter is adjustable when the reception is known and the emission must be found, and
the receiver is adjustable in the symmetric case.
*/

use crate::ad::linalg::{norm, sub};
use crate::ad::{Instant, Real};
use crate::cosmic::{Frame, PvProvider, SPEED_OF_LIGHT_KM_S};
use crate::errors::MeasurementError;
use crate::linalg::Vector3;
use crate::utils::ulp;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;

mod common;

pub use common::{observer_receiver, satellite_receiver, CommonParameters};

/// Stopping criterion of the light time iterations, on the real part of the delay.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Convergence {
    /// Stop when two successive delays differ by less than two units in the last place
    #[default]
    TwoUlp,
    /// Stop when two successive delays differ by less than this many seconds
    Tolerance(f64),
    /// Stop after the first evaluation, i.e. the signal is assumed to travel instantaneously
    Instantaneous,
}

impl Convergence {
    fn is_met(&self, previous: f64, current: f64) -> bool {
        match *self {
            Self::TwoUlp => (current - previous).abs() < 2.0 * ulp(current),
            Self::Tolerance(tol_s) => (current - previous).abs() < tol_s,
            Self::Instantaneous => true,
        }
    }
}

/// Result of a light time computation.
///
/// A delay which did not converge within the maximum number of iterations is still returned: the
/// outer estimation loop corrects the small remaining error on its next iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct LightTime<T: Real> {
    /// One way delay in seconds
    pub delay: T,
    pub iterations: usize,
    pub converged: bool,
}

impl<T: Real> fmt::Display for LightTime<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:.12e} s after {} iteration(s){}",
            self.delay.real(),
            self.iterations,
            if self.converged { "" } else { " (not converged)" }
        )
    }
}

/// Fixed point solver of the light time equation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct TravelTimeSolver {
    /// Number of iterations after the first one before giving up
    #[builder(default = 10)]
    pub max_iterations: usize,
    #[builder(default)]
    pub convergence: Convergence,
}

impl Default for TravelTimeSolver {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TravelTimeSolver {
    /// Solves for the delay between `fixed` and the moving point.
    ///
    /// `moving_at` returns the position of the moving point for a candidate delay. The iterations
    /// start from `offset`, the delay which would make the moving point sit at its guess date.
    pub fn solve<T, F>(
        &self,
        offset: &T,
        fixed: &Vector3<T>,
        mut moving_at: F,
    ) -> Result<LightTime<T>, MeasurementError>
    where
        T: Real,
        F: FnMut(&T) -> Result<Vector3<T>, MeasurementError>,
    {
        let mut delay = offset.clone();
        let mut iterations = 0;
        loop {
            let previous = delay.real();
            let moving = moving_at(&delay)?;
            delay = norm(&sub(fixed, &moving)) / SPEED_OF_LIGHT_KM_S;
            iterations += 1;
            trace!("light time iteration #{iterations}: {:.15e} s", delay.real());

            if self.convergence.is_met(previous, delay.real()) {
                return Ok(LightTime {
                    delay,
                    iterations,
                    converged: true,
                });
            }
            if iterations > self.max_iterations {
                debug!(
                    "light time unconverged after {iterations} iterations: {:.9e} s (was {:.9e} s)",
                    delay.real(),
                    previous
                );
                return Ok(LightTime {
                    delay,
                    iterations,
                    converged: false,
                });
            }
        }
    }

    /// Delay computer where the emission of the signal by `emitter` must be found.
    pub fn adjustable_emitter<'a, P>(&self, emitter: &'a P) -> AdjustableEmitter<'a, P> {
        AdjustableEmitter {
            solver: *self,
            emitter,
        }
    }

    /// Delay computer where the reception of the signal by `receiver` must be found.
    pub fn adjustable_receiver<'a, P>(&self, receiver: &'a P) -> AdjustableReceiver<'a, P> {
        AdjustableReceiver {
            solver: *self,
            receiver,
        }
    }
}

/// The reception is known, the emitter moves.
pub struct AdjustableEmitter<'a, P> {
    solver: TravelTimeSolver,
    emitter: &'a P,
}

impl<P> AdjustableEmitter<'_, P> {
    /// Computes the delay of a signal received at `receiver` at `arrival`.
    ///
    /// The emission is first guessed from the distance between the receiver and the emitter at
    /// the arrival date.
    pub fn delay<T: Real>(
        &self,
        receiver: &Vector3<T>,
        arrival: &Instant<T>,
        frame: Frame,
    ) -> Result<LightTime<T>, MeasurementError>
    where
        P: PvProvider<T>,
    {
        let emitter = self.emitter.position_at(arrival, frame)?;
        let guess = norm(&sub(receiver, &emitter)) / SPEED_OF_LIGHT_KM_S;
        let approx_emission = arrival.shifted_by(-guess);
        self.delay_with_guess(&approx_emission, receiver, arrival, frame)
    }

    /// Computes the delay of a signal received at `receiver` at `arrival`, starting from an approximate emission.
    pub fn delay_with_guess<T: Real>(
        &self,
        approx_emission: &Instant<T>,
        receiver: &Vector3<T>,
        arrival: &Instant<T>,
        frame: Frame,
    ) -> Result<LightTime<T>, MeasurementError>
    where
        P: PvProvider<T>,
    {
        let offset = arrival.duration_from(approx_emission);
        self.solver.solve(&offset, receiver, |delay| {
            let shift = offset.clone() - delay.clone();
            self.emitter
                .position_at(&approx_emission.shifted_by(shift), frame)
        })
    }
}

/// The emission is known, the receiver moves.
pub struct AdjustableReceiver<'a, P> {
    solver: TravelTimeSolver,
    receiver: &'a P,
}

impl<P> AdjustableReceiver<'_, P> {
    /// Computes the delay of a signal emitted from `emitter` at `emission`.
    ///
    /// The reception is first guessed from the distance between the emitter and the receiver at
    /// the emission date.
    pub fn delay<T: Real>(
        &self,
        emitter: &Vector3<T>,
        emission: &Instant<T>,
        frame: Frame,
    ) -> Result<LightTime<T>, MeasurementError>
    where
        P: PvProvider<T>,
    {
        let receiver = self.receiver.position_at(emission, frame)?;
        let guess = norm(&sub(emitter, &receiver)) / SPEED_OF_LIGHT_KM_S;
        let approx_reception = emission.shifted_by(guess);
        self.delay_with_guess(&approx_reception, emitter, emission, frame)
    }

    /// Computes the delay of a signal emitted from `emitter` at `emission`, starting from an approximate reception.
    pub fn delay_with_guess<T: Real>(
        &self,
        approx_reception: &Instant<T>,
        emitter: &Vector3<T>,
        emission: &Instant<T>,
        frame: Frame,
    ) -> Result<LightTime<T>, MeasurementError>
    where
        P: PvProvider<T>,
    {
        let offset = approx_reception.duration_from(emission);
        self.solver.solve(&offset, emitter, |delay| {
            let shift = delay.clone() - offset.clone();
            self.receiver
                .position_at(&approx_reception.shifted_by(shift), frame)
        })
    }
}
