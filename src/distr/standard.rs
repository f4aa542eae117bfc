//! A small catalogue of standard distributions (SPEC_FULL.md §1: "only
//! the handful needed by the testable scenarios in §8").
//!
//! Each factory pre-populates a [`ContinuousDistribution`] with PDF,
//! derivative, CDF, mode, area, and a parameter validator, mirroring the
//! original's per-family `_unur_distr_*_init` functions but limited to
//! Normal, Exponential and Cauchy — the families exercised by §8's
//! concrete scenarios. The full ~30-entry catalogue is explicitly out of
//! scope (spec.md §1).
use special::Error as SpecialError;

use crate::distr::continuous::ContinuousDistribution;
use crate::error::{ErrorKind, Result, UnurError};

/// Standard normal `N(0,1)`.
pub fn normal() -> ContinuousDistribution {
    normal_with(0.0, 1.0).expect("standard normal parameters are always valid")
}

/// `N(mu, sigma)`, `sigma > 0`. Extra parameters beyond `(mu, sigma)` are
/// rejected with `ErrorKind::DistrNParams` rather than silently truncated
/// (SPEC_FULL.md §9 resolution of the open question on parameter
/// truncation).
pub fn normal_with(mu: f64, sigma: f64) -> Result<ContinuousDistribution> {
    validate_normal(&[mu, sigma])?;
    let (m, s) = (mu, sigma);
    let norm = 1.0 / (s * (2.0 * std::f64::consts::PI).sqrt());
    let pdf = move |x: f64| {
        let z = (x - m) / s;
        norm * (-0.5 * z * z).exp()
    };
    let dpdf = move |x: f64| {
        let z = (x - m) / s;
        -(z / s) * norm * (-0.5 * z * z).exp()
    };
    let cdf = move |x: f64| {
        let z = (x - m) / (s * std::f64::consts::SQRT_2);
        0.5 * (1.0 + z.error())
    };
    let d = ContinuousDistribution::new(pdf)
        .with_name("normal")
        .with_dpdf(dpdf)
        .with_cdf(cdf)
        .set_domain(f64::NEG_INFINITY, f64::INFINITY)?
        .set_mode(mu)?
        .set_pdf_area(1.0)?
        .with_validator(|p| validate_normal(p));
    let mut d = d;
    d.set_params(&[mu, sigma])?;
    Ok(d)
}

fn validate_normal(p: &[f64]) -> Result<()> {
    if p.len() != 2 {
        return Err(UnurError::error(ErrorKind::DistrNParams, "normal takes exactly 2 parameters (mu, sigma)"));
    }
    if !(p[1] > 0.0) {
        return Err(UnurError::error(ErrorKind::DistrDomain, "sigma must be positive"));
    }
    Ok(())
}

/// `Exp(1)`: rate-1 exponential on `[0, inf)`.
pub fn exponential() -> ContinuousDistribution {
    exponential_with(1.0).expect("rate 1 is always valid")
}

/// `Exp(lambda)`, `lambda > 0`, on `[0, inf)`.
pub fn exponential_with(lambda: f64) -> Result<ContinuousDistribution> {
    validate_exponential(&[lambda])?;
    let l = lambda;
    let pdf = move |x: f64| if x < 0.0 { 0.0 } else { l * (-l * x).exp() };
    let dpdf = move |x: f64| if x < 0.0 { 0.0 } else { -l * l * (-l * x).exp() };
    let cdf = move |x: f64| if x < 0.0 { 0.0 } else { 1.0 - (-l * x).exp() };
    let mut d = ContinuousDistribution::new(pdf)
        .with_name("exponential")
        .with_dpdf(dpdf)
        .with_cdf(cdf)
        .set_domain(0.0, f64::INFINITY)?
        .set_mode(0.0)?
        .set_pdf_area(1.0)?
        .with_validator(|p| validate_exponential(p));
    d.set_params(&[lambda])?;
    Ok(d)
}

fn validate_exponential(p: &[f64]) -> Result<()> {
    if p.len() != 1 {
        return Err(UnurError::error(ErrorKind::DistrNParams, "exponential takes exactly 1 parameter (lambda)"));
    }
    if !(p[0] > 0.0) {
        return Err(UnurError::error(ErrorKind::DistrDomain, "lambda must be positive"));
    }
    Ok(())
}

/// Standard `Cauchy(0, 1)`, notorious for its heavy tails (spec.md §8
/// scenario #3, §4.2 Stage C's `tailcutfact` bump to `0.5`).
pub fn cauchy() -> ContinuousDistribution {
    cauchy_with(0.0, 1.0).expect("standard Cauchy parameters are always valid")
}

/// `Cauchy(x0, gamma)`, `gamma > 0`.
pub fn cauchy_with(x0: f64, gamma: f64) -> Result<ContinuousDistribution> {
    validate_cauchy(&[x0, gamma])?;
    let (m, g) = (x0, gamma);
    let pdf = move |x: f64| {
        let z = (x - m) / g;
        1.0 / (std::f64::consts::PI * g * (1.0 + z * z))
    };
    let dpdf = move |x: f64| {
        let z = (x - m) / g;
        let denom = std::f64::consts::PI * g * g * g * (1.0 + z * z).powi(2);
        -2.0 * (x - m) / denom
    };
    let cdf = move |x: f64| 0.5 + ((x - m) / g).atan() / std::f64::consts::PI;
    let mut d = ContinuousDistribution::new(pdf)
        .with_name("cauchy")
        .with_dpdf(dpdf)
        .with_cdf(cdf)
        .set_domain(f64::NEG_INFINITY, f64::INFINITY)?
        .set_mode(x0)?
        .with_validator(|p| validate_cauchy(p));
    // Cauchy has no finite area/mean; `set_pdf_area` is intentionally
    // skipped (the PDF as written already integrates to 1, but `area()`
    // has no natural *unnormalized* analogue here worth pre-caching).
    d.set_params(&[x0, gamma])?;
    Ok(d)
}

fn validate_cauchy(p: &[f64]) -> Result<()> {
    if p.len() != 2 {
        return Err(UnurError::error(ErrorKind::DistrNParams, "cauchy takes exactly 2 parameters (x0, gamma)"));
    }
    if !(p[1] > 0.0) {
        return Err(UnurError::error(ErrorKind::DistrDomain, "gamma must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_pdf_peaks_at_mode() {
        let d = normal();
        assert!(d.pdf(0.0) > d.pdf(0.5));
        assert!(d.pdf(0.0) > d.pdf(-0.5));
    }

    #[test]
    fn normal_cdf_at_mean_is_half() {
        let d = normal();
        assert::close(d.cdf(0.0).unwrap(), 0.5, 1e-12);
    }

    #[test]
    fn normal_rejects_extra_params() {
        assert_eq!(validate_normal(&[0.0, 1.0, 2.0]).unwrap_err().kind(), ErrorKind::DistrNParams);
    }

    #[test]
    fn exponential_cdf_matches_closed_form() {
        let d = exponential();
        assert::close(d.cdf(1.0).unwrap(), 1.0 - (-1.0_f64).exp(), 1e-12);
    }

    #[test]
    fn cauchy_cdf_is_half_at_location() {
        let d = cauchy();
        assert::close(d.cdf(0.0).unwrap(), 0.5, 1e-12);
    }

    #[test]
    fn cauchy_rejects_nonpositive_scale() {
        assert!(cauchy_with(0.0, -1.0).is_err());
    }
}
