//! ARIMA(1,1,1) demand model.
//!
//! The series is differenced once, then an ARMA(1,1) without constant is fitted
//! to the differences by conditional sum of squares:
//!
//!   e[t] = y[t] - phi*y[t-1] - theta*e[t-1],  e[0] = 0
//!
//! Parameters are optimised in tanh space so |phi| < 1 and |theta| < 1 hold
//! throughout the search. Forecasts are integrated back onto the last level.

use crate::domain::error::FitError;

pub const DEFAULT_MIN_OBSERVATIONS: usize = 10;
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

/// Fitted parameters closer than this to the unit circle are rejected.
const BOUNDARY: f64 = 0.999;
const F_TOLERANCE: f64 = 1e-10;
const X_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arima111 {
    pub min_observations: usize,
    pub max_iterations: usize,
}

impl Default for Arima111 {
    fn default() -> Self {
        Self {
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedArima {
    pub phi: f64,
    pub theta: f64,
    /// Mean squared one-step residual.
    pub sigma2: f64,
    last_level: f64,
    last_diff: f64,
    last_residual: f64,
}

impl Arima111 {
    pub fn fit(&self, series: &[f64]) -> Result<FittedArima, FitError> {
        let minimum = self.min_observations.max(3);
        if series.len() < minimum {
            return Err(FitError::InsufficientData {
                observations: series.len(),
                minimum,
            });
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite);
        }

        let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
        if variance(&diffs) <= f64::EPSILON {
            return Err(FitError::Degenerate);
        }

        let objective = |p: [f64; 2]| css(&diffs, p[0].tanh(), p[1].tanh()).0;
        let (best, iterations) = nelder_mead(objective, [0.0, 0.0], 0.5, self.max_iterations)
            .ok_or(FitError::NonConvergence {
                iterations: self.max_iterations,
            })?;
        tracing::trace!(iterations, "arima optimiser converged");

        let phi = best[0].tanh();
        let theta = best[1].tanh();
        if !phi.is_finite() || !theta.is_finite() {
            return Err(FitError::NonFinite);
        }
        if phi.abs() >= BOUNDARY || theta.abs() >= BOUNDARY {
            return Err(FitError::NonStationary { phi, theta });
        }

        let (sse, last_residual) = css(&diffs, phi, theta);
        let sigma2 = sse / (diffs.len() - 1) as f64;
        if !sigma2.is_finite() {
            return Err(FitError::NonFinite);
        }

        Ok(FittedArima {
            phi,
            theta,
            sigma2,
            last_level: series[series.len() - 1],
            last_diff: diffs[diffs.len() - 1],
            last_residual,
        })
    }
}

impl FittedArima {
    /// Point forecasts of the undifferenced series for the next
    /// `horizon` steps.
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>, FitError> {
        let mut levels = Vec::with_capacity(horizon);
        let mut level = self.last_level;
        let mut diff = self.phi * self.last_diff + self.theta * self.last_residual;

        for _ in 0..horizon {
            level += diff;
            if !level.is_finite() {
                return Err(FitError::NonFinite);
            }
            levels.push(level);
            diff *= self.phi;
        }

        Ok(levels)
    }
}

/// Conditional sum of squares and the final residual.
fn css(y: &[f64], phi: f64, theta: f64) -> (f64, f64) {
    let mut prev_e = 0.0;
    let mut sse = 0.0;
    for t in 1..y.len() {
        let e = y[t] - phi * y[t - 1] - theta * prev_e;
        sse += e * e;
        prev_e = e;
    }
    (sse, prev_e)
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Two-dimensional Nelder-Mead minimiser. Returns the best vertex and the
/// number of iterations used, or `None` if the budget ran out first.
fn nelder_mead<F>(f: F, start: [f64; 2], step: f64, max_iterations: usize) -> Option<([f64; 2], usize)>
where
    F: Fn([f64; 2]) -> f64,
{
    let mut simplex = [
        start,
        [start[0] + step, start[1]],
        [start[0], start[1] + step],
    ];
    let mut values = simplex.map(&f);

    for iteration in 0..max_iterations {
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.map(|i| simplex[i]);
        values = order.map(|i| values[i]);

        let spread = (values[2] - values[0]).abs();
        let size = simplex[1..]
            .iter()
            .map(|v| (v[0] - simplex[0][0]).abs().max((v[1] - simplex[0][1]).abs()))
            .fold(0.0_f64, f64::max);
        if spread <= F_TOLERANCE * (1.0 + values[0].abs()) && size <= X_TOLERANCE {
            return Some((simplex[0], iteration));
        }

        let centroid = [
            (simplex[0][0] + simplex[1][0]) / 2.0,
            (simplex[0][1] + simplex[1][1]) / 2.0,
        ];
        let along = |t: f64| {
            [
                centroid[0] + t * (simplex[2][0] - centroid[0]),
                centroid[1] + t * (simplex[2][1] - centroid[1]),
            ]
        };

        let reflected = along(-1.0);
        let f_reflected = f(reflected);

        if f_reflected < values[0] {
            let expanded = along(-2.0);
            let f_expanded = f(expanded);
            if f_expanded < f_reflected {
                simplex[2] = expanded;
                values[2] = f_expanded;
            } else {
                simplex[2] = reflected;
                values[2] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[1] {
            simplex[2] = reflected;
            values[2] = f_reflected;
            continue;
        }

        let (contracted, f_contracted) = if f_reflected < values[2] {
            let c = along(-0.5);
            (c, f(c))
        } else {
            let c = along(0.5);
            (c, f(c))
        };

        if f_contracted < values[2].min(f_reflected) {
            simplex[2] = contracted;
            values[2] = f_contracted;
            continue;
        }

        // Shrink towards the best vertex.
        for i in 1..3 {
            simplex[i] = [
                simplex[0][0] + 0.5 * (simplex[i][0] - simplex[0][0]),
                simplex[0][1] + 0.5 * (simplex[i][1] - simplex[0][1]),
            ];
            values[i] = f(simplex[i]);
        }
    }

    None
}
