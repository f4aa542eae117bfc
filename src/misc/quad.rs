//! Gauss-Lobatto quadrature (SPEC_FULL.md §4, PINV Stage B).
//!
//! PINV integrates the target density with the 5-point Gauss-Lobatto rule,
//! refining the panel width by comparing a one-panel and a two-panel
//! estimate and adjusting the step by a ninth-root factor (the rule is
//! formally 9th order accurate for a smooth integrand), exactly as
//! `_unur_pinv_Udiv` / `_unur_pinv_relevant_support` does in
//! `examples/original_source/devel/src/pinvwh.c`.

/// Nodes of the 5-point Gauss-Lobatto rule on `[-1, 1]`.
const NODES: [f64; 5] = [-1.0, -0.654_653_670_707_977_1, 0.0, 0.654_653_670_707_977_1, 1.0];
/// Weights matching [`NODES`].
const WEIGHTS: [f64; 5] = [0.1, 0.544_444_444_444_444_4, 0.711_111_111_111_111_1, 0.544_444_444_444_444_4, 0.1];

/// Fixed 5-point Gauss-Lobatto estimate of `∫_a^b f` with no error control.
pub fn gauss_lobatto5<F>(f: &F, a: f64, b: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let half = (b - a) / 2.0;
    let mid = (a + b) / 2.0;
    let mut sum = 0.0;
    for (node, weight) in NODES.iter().zip(WEIGHTS.iter()) {
        sum += weight * f(mid + half * node);
    }
    half * sum
}

/// Outcome of an adaptive-panel integration: the estimated area and the
/// panel width that was ultimately accepted (a caller walking left to
/// right uses this as the next trial step, per the PINV Stage B/D rule
/// of shrinking/growing `h` by `(target/err)^(1/9)`).
#[derive(Debug, Clone, Copy)]
pub struct LobattoResult {
    pub area: f64,
    pub accepted_h: f64,
    pub converged: bool,
}

/// Integrate `f` over `[a, b]` by comparing a one-panel and a two-panel
/// 5-point Gauss-Lobatto estimate; if the relative difference exceeds
/// `rel_tol`, shrink the interval by `(rel_tol/err)^(1/9)` and retry,
/// down to `min_h`. Mirrors `_unur_pinv_cdf_window` / the step adjustment
/// in `pinvwh.c`'s `setup()` (§4.2 Stage B/D of SPEC_FULL.md).
pub fn adaptive_lobatto<F>(f: &F, a: f64, b: f64, rel_tol: f64, min_h: f64) -> LobattoResult
where
    F: Fn(f64) -> f64,
{
    let mut h = b - a;
    if h <= 0.0 {
        return LobattoResult { area: 0.0, accepted_h: 0.0, converged: true };
    }
    loop {
        let b1 = a + h;
        let one_panel = gauss_lobatto5(f, a, b1);
        let mid = a + h / 2.0;
        let two_panel = gauss_lobatto5(f, a, mid) + gauss_lobatto5(f, mid, b1);
        let scale = one_panel.abs().max(two_panel.abs()).max(1e-300);
        let err = (one_panel - two_panel).abs() / scale;
        if err <= rel_tol || h <= min_h {
            return LobattoResult {
                area: two_panel,
                accepted_h: h,
                converged: err <= rel_tol,
            };
        }
        let factor = (rel_tol / err).powf(1.0 / 9.0);
        h = (h * factor).max(min_h);
    }
}

/// Suggest the next panel width after an accepted step, growing it when
/// the achieved error was comfortably below tolerance (the `1.2`/`2.0`
/// factors from `pinvwh.c`, see SPEC_FULL.md §4 bullet on step-size
/// adjustment factors).
pub fn grow_step(h: f64, err: f64, rel_tol: f64, max_h: f64) -> f64 {
    if err <= 1e-300 {
        return (h * 2.0).min(max_h);
    }
    let factor = (rel_tol / err).powf(1.0 / 9.0);
    let factor = if factor > 4.0 { 2.0 } else { factor.max(1.0) };
    (h * factor).min(max_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrates_polynomial_exactly() {
        let f = |x: f64| x * x;
        let area = gauss_lobatto5(&f, 0.0, 1.0);
        assert::close(area, 1.0 / 3.0, 1e-12);
    }

    #[test]
    fn adaptive_matches_known_integral() {
        let f = |x: f64| (-x * x / 2.0).exp();
        let result = adaptive_lobatto(&f, -5.0, 5.0, 1e-10, 1e-8);
        // integral of the unnormalized Gaussian kernel over (-5,5) ~ sqrt(2 pi)
        assert::close(result.area, (2.0 * std::f64::consts::PI).sqrt(), 1e-3);
    }
}
