//! NROU / MROU — ratio-of-uniforms (SPEC_FULL.md §4.3).
//!
//! One dimension-generic implementation: `_unur_rou_rectangle` in
//! `examples/original_source/trunk/src/utils/rou_rectangle.c` is itself
//! dimension-generic (loops `for (d=0; d<dim; d++)`), so NROU (`dim=1`)
//! and MROU (`dim>1`) share one bounding-box search and one
//! accept/reject loop over `nalgebra::DVector<f64>` (§4 "Component
//! design" resolution of how NROU/MROU relate).
use std::sync::Arc;

use nalgebra::DVector;

use crate::distr::{ContinuousDistribution, MultivariateDistribution};
use crate::error::{ErrorKind, Result, UnurError};
use crate::log;
use crate::misc::hooke::HookeJeeves;
use crate::urng::Urng;

type PdfFn = Arc<dyn Fn(&DVector<f64>) -> f64 + Send + Sync>;

/// Bounding-box search tuning, matching the `#define`s in
/// `rou_rectangle.c` (SPEC_FULL.md §4: `rho=0.5`, `epsilon=1e-7`,
/// `max_iter=10000`, box inflation `1e-4`).
const RECT_SCALING: f64 = 1e-4;

/// Parameter object for NROU/MROU (SPEC_FULL.md §3.2, §4.3).
pub struct RouParams {
    dim: usize,
    pdf: PdfFn,
    center: DVector<f64>,
    mode_hint: Option<DVector<f64>>,
    r: f64,
    hooke: HookeJeeves,
    urng: Box<dyn Urng>,
}

impl RouParams {
    /// NROU against the process's default URNG (`config::default_urng`).
    pub fn univariate_default(distr: &ContinuousDistribution, center: f64, r: f64) -> Self {
        Self::univariate(distr, center, r, crate::config::default_urng())
    }

    /// NROU: `dim = 1`.
    pub fn univariate(distr: &ContinuousDistribution, center: f64, r: f64, urng: Box<dyn Urng>) -> Self {
        let distr = distr.clone();
        let pdf: PdfFn = Arc::new(move |x: &DVector<f64>| distr.pdf(x[0]));
        RouParams {
            dim: 1,
            pdf,
            center: DVector::from_vec(vec![center]),
            mode_hint: None,
            r,
            hooke: HookeJeeves::default(),
            urng,
        }
    }

    /// MROU against the process's default URNG (`config::default_urng`).
    pub fn multivariate_default(distr: &MultivariateDistribution, center: DVector<f64>, r: f64) -> Self {
        Self::multivariate(distr, center, r, crate::config::default_urng())
    }

    /// MROU: `dim > 1`, from a multivariate distribution's PDF.
    pub fn multivariate(distr: &MultivariateDistribution, center: DVector<f64>, r: f64, urng: Box<dyn Urng>) -> Self {
        let dim = distr.dim();
        let distr = distr.clone();
        let pdf: PdfFn = Arc::new(move |x: &DVector<f64>| distr.pdf(x));
        RouParams { dim, pdf, center, mode_hint: None, r, hooke: HookeJeeves::default(), urng }
    }

    pub fn mode_hint(mut self, mode: DVector<f64>) -> Self {
        self.mode_hint = Some(mode);
        self
    }

    pub fn hooke(mut self, hooke: HookeJeeves) -> Self {
        self.hooke = hooke;
        self
    }

    pub fn init(self) -> Result<RouGenerator> {
        log::record(log::Event::SetupStart, "rou");
        let d = self.dim as f64;
        let exponent = 1.0 / (self.r * d + 1.0);
        let start = self.mode_hint.clone().unwrap_or_else(|| self.center.clone());

        let pdf = self.pdf.clone();
        let v_obj = {
            let pdf = pdf.clone();
            move |x: &DVector<f64>| -pdf(x).max(0.0).powf(exponent)
        };
        let v_result = self.hooke.minimize(v_obj, &start, 1.0);
        let mut v_max = (-v_result.f).max(1e-300);
        if !v_result.converged {
            let retry = HookeJeeves::new(self.hooke.rho, self.hooke.epsilon * 0.1, self.hooke.max_iter);
            let retry_result = retry.minimize(
                {
                    let pdf = pdf.clone();
                    move |x: &DVector<f64>| -pdf(x).max(0.0).powf(exponent)
                },
                &v_result.x,
                self.hooke.epsilon,
            );
            if -retry_result.f > v_max {
                v_max = (-retry_result.f).max(1e-300);
            }
            if !retry_result.converged {
                let _ = UnurError::warning(ErrorKind::Gen, "Hooke-Jeeves search for v_max did not converge; proceeding with best effort");
            }
        }
        if !v_max.is_finite() {
            return Err(UnurError::error(ErrorKind::SetupInfinite, "v_max is not finite"));
        }

        let u_exponent = self.r / (self.r * d + 1.0);
        let mut u_min = DVector::zeros(self.dim);
        let mut u_max = DVector::zeros(self.dim);
        for k in 0..self.dim {
            let center_k = self.center[k];
            let g_max = {
                let pdf = pdf.clone();
                move |x: &DVector<f64>| -((x[k] - center_k) * pdf(x).max(0.0).powf(u_exponent))
            };
            let g_min = {
                let pdf = pdf.clone();
                move |x: &DVector<f64>| (x[k] - center_k) * pdf(x).max(0.0).powf(u_exponent)
            };
            let max_res = self.hooke.minimize(g_max, &start, 1.0);
            let min_res = self.hooke.minimize(g_min, &start, 1.0);
            let umax_k = -max_res.f;
            let umin_k = min_res.f;
            if !umax_k.is_finite() || !umin_k.is_finite() {
                return Err(UnurError::error(ErrorKind::SetupInfinite, "u_min/u_max bound is not finite"));
            }
            u_min[k] = umin_k;
            u_max[k] = umax_k;
        }

        v_max *= 1.0 + RECT_SCALING;
        for k in 0..self.dim {
            let width = u_max[k] - u_min[k];
            u_min[k] -= width * RECT_SCALING / 2.0;
            u_max[k] += width * RECT_SCALING / 2.0;
        }

        log::record(log::Event::SetupComplete, format!("rou: dim={}, v_max={:.6e}", self.dim, v_max));

        Ok(RouGenerator {
            dim: self.dim,
            pdf: self.pdf,
            center: self.center,
            r: self.r,
            v_max,
            u_min,
            u_max,
            urng: self.urng,
        })
    }
}

/// Generator object for NROU/MROU (SPEC_FULL.md §3.3, §4.3 sampling
/// contract).
pub struct RouGenerator {
    dim: usize,
    pdf: PdfFn,
    center: DVector<f64>,
    r: f64,
    v_max: f64,
    u_min: DVector<f64>,
    u_max: DVector<f64>,
    urng: Box<dyn Urng>,
}

impl RouGenerator {
    /// Draw one vector variate (§4.3 steps 1-4).
    pub fn sample(&mut self) -> DVector<f64> {
        self.sample_with_witness().2
    }

    /// Draw one vector variate together with the accepted `(v, u)` pair
    /// that produced it, so a caller can re-check the testable invariant
    /// `v^(r*d+1) <= f(u/v^r + center)` (§8 invariant 3) against the
    /// actual quantities the acceptance test used, rather than against a
    /// value recomputed independently.
    pub fn sample_with_witness(&mut self) -> (f64, DVector<f64>, DVector<f64>) {
        loop {
            let v = self.urng.next_uniform() * self.v_max;
            let mut u = DVector::zeros(self.dim);
            for k in 0..self.dim {
                u[k] = self.u_min[k] + self.urng.next_uniform() * (self.u_max[k] - self.u_min[k]);
            }
            let mut x = DVector::zeros(self.dim);
            for k in 0..self.dim {
                x[k] = u[k] / v.powf(self.r) + self.center[k];
            }
            let lhs = v.powf(self.r * self.dim as f64 + 1.0);
            if lhs <= (self.pdf)(&x) {
                return (v, u, x);
            }
        }
    }

    /// Convenience accessor for the univariate case (NROU, `dim == 1`).
    pub fn sample_scalar(&mut self) -> f64 {
        self.sample()[0]
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn v_max(&self) -> f64 {
        self.v_max
    }

    pub fn u_bounds(&self) -> (&DVector<f64>, &DVector<f64>) {
        (&self.u_min, &self.u_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urng::StdUrng;
    use nalgebra::DMatrix;

    #[test]
    fn nrou_unnormalized_gaussian_matches_normal_moments() {
        let distr = ContinuousDistribution::new(|x: f64| (-x * x / 2.0).exp())
            .set_domain(f64::NEG_INFINITY, f64::INFINITY)
            .unwrap()
            .set_mode(0.0)
            .unwrap();
        let params = RouParams::univariate(&distr, 0.0, 1.0, Box::new(StdUrng::seed_from_u64(1)));
        let mut gen = params.init().unwrap();
        let n = 20_000;
        let xs: Vec<f64> = (0..n).map(|_| gen.sample_scalar()).collect();
        let mean: f64 = xs.iter().sum::<f64>() / n as f64;
        let max_dev = xs.iter().fold(0.0_f64, |acc, &x| acc.max(x.abs()));
        assert::close(mean, 0.0, 0.05);
        assert!(max_dev < 20.0);
    }

    #[test]
    fn mrou_bivariate_standard_normal_recovers_correlation() {
        let mean = DVector::from_vec(vec![0.0, 0.0]);
        let covar = DMatrix::<f64>::identity(2, 2);
        let pdf = |x: &DVector<f64>| (-0.5 * x.dot(x)).exp();
        let distr = MultivariateDistribution::new(pdf, mean, covar).unwrap();
        let center = DVector::from_vec(vec![0.0, 0.0]);
        let params = RouParams::multivariate(&distr, center, 1.0, Box::new(StdUrng::seed_from_u64(2)));
        let mut gen = params.init().unwrap();
        let n = 20_000;
        let samples: Vec<DVector<f64>> = (0..n).map(|_| gen.sample()).collect();
        let mean0: f64 = samples.iter().map(|s| s[0]).sum::<f64>() / n as f64;
        let mean1: f64 = samples.iter().map(|s| s[1]).sum::<f64>() / n as f64;
        assert::close(mean0, 0.0, 0.05);
        assert::close(mean1, 0.0, 0.05);

        let var0: f64 = samples.iter().map(|s| (s[0] - mean0).powi(2)).sum::<f64>() / n as f64;
        let var1: f64 = samples.iter().map(|s| (s[1] - mean1).powi(2)).sum::<f64>() / n as f64;
        let cov01: f64 = samples.iter().map(|s| (s[0] - mean0) * (s[1] - mean1)).sum::<f64>() / n as f64;
        let corr = cov01 / (var0.sqrt() * var1.sqrt());
        assert!(corr.abs() < 0.02, "empirical correlation {corr} exceeds the scenario #5 bound");
    }

    #[test]
    fn accepted_points_satisfy_the_rou_inequality() {
        let distr = ContinuousDistribution::new(|x: f64| (-x * x / 2.0).exp())
            .set_domain(f64::NEG_INFINITY, f64::INFINITY)
            .unwrap()
            .set_mode(0.0)
            .unwrap();
        let params = RouParams::univariate(&distr, 0.0, 1.0, Box::new(StdUrng::seed_from_u64(3)));
        let mut gen = params.init().unwrap();
        for _ in 0..1000 {
            let (v, u, x) = gen.sample_with_witness();
            let lhs = v.powf(gen.r * gen.dim as f64 + 1.0);
            let fx = (gen.pdf)(&x);
            assert!(lhs <= fx + 1e-12, "v={v} u={u:?} x={x:?}: v^(rd+1)={lhs} > f(x)={fx}");
        }
    }
}
