//! Hooke-Jeeves pattern search (SPEC_FULL.md §4.3, NROU/MROU bounding box).
//!
//! A derivative-free direct-search optimizer: explore each coordinate
//! direction from a base point, then take a speculative "pattern" step
//! along the direction that improved things, shrinking the step size by
//! `rho` whenever no exploratory move improves on the current best.
//! Matches `_unur_util_hooke` in
//! `examples/original_source/trunk/src/utils/rou_rectangle.c`.
use nalgebra::DVector;

/// Outcome of a pattern-search run.
#[derive(Debug, Clone)]
pub struct HookeResult {
    pub x: DVector<f64>,
    pub f: f64,
    pub converged: bool,
    pub iterations: usize,
}

/// A Hooke-Jeeves pattern-search optimizer, parameterized the way the
/// original's `#define`s fix it for the rectangle search: `rho = 0.5`,
/// `epsilon = 1e-7`, `max_iter = 10000` by default.
#[derive(Debug, Clone, Copy)]
pub struct HookeJeeves {
    pub rho: f64,
    pub epsilon: f64,
    pub max_iter: usize,
}

impl Default for HookeJeeves {
    fn default() -> Self {
        HookeJeeves {
            rho: 0.5,
            epsilon: 1.0e-7,
            max_iter: 10_000,
        }
    }
}

impl HookeJeeves {
    pub fn new(rho: f64, epsilon: f64, max_iter: usize) -> Self {
        HookeJeeves { rho, epsilon, max_iter }
    }

    /// Minimize `f` starting from `x0` with initial step `step0` (applied
    /// uniformly to every coordinate).
    pub fn minimize<F>(&self, f: F, x0: &DVector<f64>, step0: f64) -> HookeResult
    where
        F: Fn(&DVector<f64>) -> f64,
    {
        let n = x0.len();
        let mut xb = x0.clone();
        let mut fb = f(&xb);
        let mut step = step0;
        let mut iterations = 0usize;
        let mut converged = false;

        while step > self.epsilon && iterations < self.max_iter {
            let (xt, ft) = self.explore(&f, &xb, fb, step);
            iterations += 1;
            if ft < fb {
                // pattern move: extrapolate in the direction that worked.
                let mut xp = &xt + (&xt - &xb);
                let mut fp = f(&xp);
                iterations += 1;
                xb = xt;
                fb = ft;
                while fp < fb && iterations < self.max_iter {
                    let (xt2, ft2) = self.explore(&f, &xp, fp, step);
                    iterations += 1;
                    if ft2 >= fp {
                        break;
                    }
                    xb = xp;
                    fb = fp;
                    xp = &xt2 + (&xt2 - &xb);
                    fp = f(&xp);
                    iterations += 1;
                }
            } else {
                step *= self.rho;
            }
            let _ = n;
        }
        if step <= self.epsilon {
            converged = true;
        }
        HookeResult { x: xb, f: fb, converged, iterations }
    }

    /// Exploratory move: perturb each coordinate by `+step`/`-step` in
    /// turn, keeping whichever improves on the running best.
    fn explore<F>(&self, f: &F, base: &DVector<f64>, base_f: f64, step: f64) -> (DVector<f64>, f64)
    where
        F: Fn(&DVector<f64>) -> f64,
    {
        let mut x = base.clone();
        let mut fx = base_f;
        for i in 0..base.len() {
            let orig = x[i];
            x[i] = orig + step;
            let f_plus = f(&x);
            if f_plus < fx {
                fx = f_plus;
                continue;
            }
            x[i] = orig - step;
            let f_minus = f(&x);
            if f_minus < fx {
                fx = f_minus;
                continue;
            }
            x[i] = orig;
        }
        (x, fx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizes_paraboloid() {
        let f = |x: &DVector<f64>| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2);
        let hj = HookeJeeves::default();
        let x0 = DVector::from_vec(vec![0.0, 0.0]);
        let result = hj.minimize(f, &x0, 1.0);
        assert::close(result.x[0], 1.0, 1e-4);
        assert::close(result.x[1], -2.0, 1e-4);
    }
}
