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
mod gradients;
mod light_time;
mod measurements;

use nyx_measurements::od::msr::MeasurementModel;
use nyx_measurements::od::params::ParameterDriver;
use nyx_measurements::SpacecraftState;

/// Checks `analytic` against the central finite difference `(plus - minus) / (2 h)`, the tolerance
/// accounting for the rounding of values of magnitude `value`.
fn assert_partial(what: &str, analytic: f64, plus: f64, minus: f64, h: f64, value: f64) {
    let numeric = (plus - minus) / (2.0 * h);
    let tolerance = 1e-6 * analytic.abs().max(numeric.abs()) + 1e-14 * value.abs().max(1.0) / h;
    assert!(
        (analytic - numeric).abs() <= tolerance,
        "{what}: analytic {analytic:e} vs numeric {numeric:e} (tolerance {tolerance:e})"
    );
}

/// Compares the partials with respect to the position and velocity of each state to finite differences.
pub fn assert_state_partials<M: MeasurementModel>(model: &M, states: &[SpacecraftState]) {
    let estimated = model.evaluate(0, 0, states).unwrap();
    assert_eq!(estimated.state_derivatives.len(), states.len());

    for (k, partials) in estimated.state_derivatives.iter().enumerate() {
        assert_eq!(partials.ncols(), 6);
        for j in 0..6 {
            let h = if j < 3 { 1e-3 } else { 1e-5 };
            let evaluate = |delta: f64| {
                let mut perturbed = states.to_vec();
                let state = &mut perturbed[k];
                if j < 3 {
                    state.position_km[j] += delta;
                } else {
                    state.velocity_km_s[j - 3] += delta;
                }
                if let Some(mu) = state.mu_km3_s2 {
                    *state = state.clone().with_keplerian_acceleration(mu);
                }
                model
                    .evaluate_without_derivatives(0, 0, &perturbed)
                    .unwrap()
                    .estimated
            };
            let plus = evaluate(h);
            let minus = evaluate(-h);
            for i in 0..estimated.estimated().len() {
                assert_partial(
                    &format!("{} #{i} wrt state {k} component {j}", model.measurement_type()),
                    partials[(i, j)],
                    plus[i],
                    minus[i],
                    h,
                    estimated.estimated()[i],
                );
            }
        }
    }
}

/// Compares the partial with respect to a selected parameter to finite differences, the parameter
/// being perturbed by its scale. All of the drivers returned by `drivers` share the same name, e.g.
/// the Earth orientation offsets of two stations, and are perturbed together.
pub fn assert_parameter_partial<M, F>(model: &M, states: &[SpacecraftState], drivers: F)
where
    M: MeasurementModel + Clone,
    F: Fn(&mut M) -> Vec<&mut ParameterDriver>,
{
    let mut model = model.clone();
    let (name, h, value) = {
        let mut drivers = drivers(&mut model);
        for driver in drivers.iter_mut() {
            driver.set_selected(true);
        }
        let first = &drivers[0];
        (first.name.clone(), first.scale, first.value())
    };
    let estimated = model.evaluate(0, 0, states).unwrap();
    let analytic = estimated
        .parameter_derivative(&name)
        .unwrap_or_else(|| panic!("no partial for {name}"))
        .clone();

    let evaluate = |delta: f64| {
        let mut perturbed = model.clone();
        for driver in drivers(&mut perturbed) {
            driver.set_value(value + delta);
        }
        perturbed
            .evaluate_without_derivatives(0, 0, states)
            .unwrap()
            .estimated
    };
    let plus = evaluate(h);
    let minus = evaluate(-h);
    for i in 0..analytic.len() {
        assert_partial(
            &format!("{} #{i} wrt {name}", model.measurement_type()),
            analytic[i],
            plus[i],
            minus[i],
            h,
            estimated.estimated()[i],
        );
    }
}
