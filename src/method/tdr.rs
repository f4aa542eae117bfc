//! TDR — Transformed Density Rejection (SPEC_FULL.md §4.1).
//!
//! Requires the PDF and its derivative on a known (possibly unbounded)
//! interval. Builds a piecewise hat from tangent lines to `T∘f` at a set
//! of construction points and a piecewise squeeze from the secant lines
//! between adjacent construction points, where `T` is a strictly
//! increasing concave transform. The two named variants, `Ps` and `Gw`,
//! are two distinct interval-construction schemes over one shared
//! sampling/guide-table/adaptive-insertion scaffold (§9 open question:
//! "treat them as two full methods sharing scaffolding").
use crate::distr::ContinuousDistribution;
use crate::error::{ErrorKind, Result, UnurError};
use crate::log;
use crate::misc::GuideTable;
use crate::urng::Urng;

/// The transform `T` applied to the density before checking concavity.
/// `Log` is `T(t) = ln(t)`; `Sqrt` is `T_c(t) = -t^c` at `c = -1/2`, the
/// value the spec calls out by name alongside the log transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Log,
    Sqrt,
}

impl Transform {
    fn t(&self, v: f64) -> f64 {
        match self {
            Transform::Log => v.ln(),
            Transform::Sqrt => -1.0 / v.sqrt(),
        }
    }

    /// `dT/dv` at `v`.
    fn t_prime(&self, v: f64) -> f64 {
        match self {
            Transform::Log => 1.0 / v,
            Transform::Sqrt => 0.5 * v.powf(-1.5),
        }
    }

    /// `T^-1(y)`, i.e. maps a transformed-scale value back to a density
    /// value.
    fn inv(&self, y: f64) -> f64 {
        match self {
            Transform::Log => y.exp(),
            Transform::Sqrt => 1.0 / (y * y),
        }
    }
}

/// Interval-construction scheme (§9 open question).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    /// "PS": each gap between adjacent construction points gets a single
    /// hat segment, the tangent at the gap's left point.
    Ps,
    /// "GW": each gap is split at the intersection of the two adjacent
    /// tangent lines, giving a tighter (two-piece) hat per gap.
    Gw,
}

/// One construction point and its local tangent data in the transformed
/// scale: `Tf(x)` and `d(Tf)/dx` at `x`.
#[derive(Debug, Clone, Copy)]
struct ConstructionPoint {
    x: f64,
    tf: f64,
    tf_prime: f64,
}

/// A tangent line in the transformed scale, anchored at `(x0, t0)` with
/// slope `slope`, together with the closed-form antiderivative/inverse
/// needed to compute and invert hat area over a sub-interval.
#[derive(Debug, Clone, Copy)]
struct Tangent {
    x0: f64,
    t0: f64,
    slope: f64,
    transform: Transform,
}

impl Tangent {
    fn y(&self, x: f64) -> f64 {
        self.t0 + self.slope * (x - self.x0)
    }

    fn hat(&self, x: f64) -> f64 {
        self.transform.inv(self.y(x))
    }

    /// Area under the hat from `a` to `b` (`b` may be `+inf`, `a` may be
    /// `-inf`, provided the slope sign makes the tail integrable —
    /// checked at setup).
    fn area(&self, a: f64, b: f64) -> f64 {
        let ya = self.y(a);
        let yb = self.y(b);
        match self.transform {
            Transform::Log => {
                if self.slope.abs() < 1e-12 {
                    ya.exp() * (b - a)
                } else {
                    (yb.exp() - ya.exp()) / self.slope
                }
            }
            Transform::Sqrt => {
                if self.slope.abs() < 1e-12 {
                    (b - a) / (ya * ya)
                } else {
                    (1.0 / ya - 1.0 / yb) / self.slope
                }
            }
        }
    }

    /// Solve for `x` such that `area(a, x) == target_area`.
    fn invert(&self, a: f64, target_area: f64) -> f64 {
        let ya = self.y(a);
        match self.transform {
            Transform::Log => {
                if self.slope.abs() < 1e-12 {
                    a + target_area / ya.exp()
                } else {
                    let yx = (ya.exp() + self.slope * target_area).ln();
                    self.x0 + (yx - self.t0) / self.slope
                }
            }
            Transform::Sqrt => {
                if self.slope.abs() < 1e-12 {
                    a + target_area * ya * ya
                } else {
                    let inv_yx = 1.0 / ya - self.slope * target_area;
                    let yx = 1.0 / inv_yx;
                    self.x0 + (yx - self.t0) / self.slope
                }
            }
        }
    }
}

/// One piece of the piecewise hat/squeeze, covering `[left, right]`.
#[derive(Debug, Clone, Copy)]
struct Piece {
    left: f64,
    right: f64,
    tangent: Tangent,
    /// Secant (squeeze) line in transformed scale, if this piece lies
    /// within a gap bounded by two construction points on both sides.
    squeeze: Option<Tangent>,
}

/// Parameter object for TDR (SPEC_FULL.md §3.2, §4.1 setup contract).
pub struct TdrParams {
    distr: ContinuousDistribution,
    transform: Transform,
    variant: Variant,
    construction_points: Option<Vec<f64>>,
    max_intervals: usize,
    guide_factor: f64,
    verify: bool,
    adaptive: bool,
    adaptive_threshold: f64,
    urng: Box<dyn Urng>,
}

impl TdrParams {
    /// Build against the process's default URNG (`config::default_urng`)
    /// instead of threading one through explicitly.
    pub fn new_default(distr: ContinuousDistribution) -> Self {
        Self::new(distr, crate::config::default_urng())
    }

    pub fn new(distr: ContinuousDistribution, urng: Box<dyn Urng>) -> Self {
        TdrParams {
            distr,
            transform: Transform::Log,
            variant: Variant::Gw,
            construction_points: None,
            max_intervals: 100,
            guide_factor: 1.0,
            verify: false,
            adaptive: true,
            adaptive_threshold: 0.9,
            urng,
        }
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn construction_points(mut self, points: Vec<f64>) -> Self {
        self.construction_points = Some(points);
        self
    }

    pub fn max_intervals(mut self, n: usize) -> Self {
        self.max_intervals = n.max(2);
        self
    }

    pub fn guide_factor(mut self, factor: f64) -> Self {
        self.guide_factor = factor.max(0.1);
        self
    }

    pub fn verify(mut self, on: bool) -> Self {
        self.verify = on;
        self
    }

    pub fn adaptive(mut self, on: bool) -> Self {
        self.adaptive = on;
        self
    }

    /// Consume the parameter object and build a generator (SPEC_FULL.md
    /// §3.2: "exactly one `init` consumes it").
    pub fn init(self) -> Result<TdrGenerator> {
        if !self.distr.has_dpdf() {
            return Err(UnurError::error(ErrorKind::DistrDataMissing, "TDR requires the PDF's derivative"));
        }
        log::record(log::Event::SetupStart, "tdr");

        let (dom_a, dom_b) = self.distr.domain();
        let raw_points = match &self.construction_points {
            Some(p) => p.clone(),
            None => default_construction_points(&self.distr, dom_a, dom_b)?,
        };
        if raw_points.len() < 2 {
            return Err(UnurError::error(ErrorKind::ParInvalid, "TDR needs at least two construction points"));
        }
        let mut points = Vec::with_capacity(raw_points.len());
        for x in raw_points {
            points.push(make_point(&self.distr, self.transform, x)?);
        }
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
        points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-12);

        check_concavity(&points)?;
        let pieces = build_pieces(&points, dom_a, dom_b, self.variant, self.transform)?;
        let (cum, total) = cumulative_areas(&pieces);
        let guide_size = ((pieces.len() as f64) * self.guide_factor).ceil().max(1.0) as usize;
        let guide = GuideTable::build(&cum, total, guide_size);

        log::record(log::Event::SetupComplete, format!("tdr: {} intervals, area={:.6e}", pieces.len(), total));

        Ok(TdrGenerator {
            distr: self.distr,
            transform: self.transform,
            variant: self.variant,
            dom: (dom_a, dom_b),
            points,
            pieces,
            cum,
            total_area: total,
            guide,
            max_intervals: self.max_intervals,
            guide_factor: self.guide_factor,
            verify: self.verify,
            adaptive: self.adaptive,
            adaptive_threshold: self.adaptive_threshold,
            urng: self.urng,
        })
    }
}

fn default_construction_points(distr: &ContinuousDistribution, a: f64, b: f64) -> Result<Vec<f64>> {
    if let Ok(mode) = distr.mode() {
        let lo = (mode - 1.0).max(a + if a.is_finite() { 1e-6 } else { 0.0 });
        let hi = (mode + 1.0).min(b - if b.is_finite() { 1e-6 } else { 0.0 });
        if lo < hi {
            return Ok(vec![lo, hi]);
        }
    }
    if a.is_finite() && b.is_finite() {
        let span = b - a;
        return Ok(vec![a + span / 3.0, a + 2.0 * span / 3.0]);
    }
    Err(UnurError::error(
        ErrorKind::ParInvalid,
        "TDR needs explicit construction points when the domain is unbounded and no mode is known",
    ))
}

fn make_point(distr: &ContinuousDistribution, transform: Transform, x: f64) -> Result<ConstructionPoint> {
    let fx = distr.pdf(x);
    if !(fx > 0.0) {
        return Err(UnurError::error(ErrorKind::SetupCondition, "construction point has zero or negative density"));
    }
    let dfx = distr.dpdf(x)?;
    Ok(ConstructionPoint {
        x,
        tf: transform.t(fx),
        tf_prime: transform.t_prime(fx) * dfx,
    })
}

/// T-concavity requires `d(T∘f)/dx` to be non-increasing across
/// construction points (§4.1 setup contract).
fn check_concavity(points: &[ConstructionPoint]) -> Result<()> {
    for w in points.windows(2) {
        if w[1].tf_prime > w[0].tf_prime + 1e-8 {
            return Err(UnurError::error(
                ErrorKind::SetupCondition,
                "T-concavity violated: d(T\u{2218}f)/dx is not monotone across construction points",
            ));
        }
    }
    Ok(())
}

fn build_pieces(points: &[ConstructionPoint], dom_a: f64, dom_b: f64, variant: Variant, transform: Transform) -> Result<Vec<Piece>> {
    let n = points.len();
    let mut pieces = Vec::new();

    // Left unbounded/outer piece.
    let left_tangent = Tangent { x0: points[0].x, t0: points[0].tf, slope: points[0].tf_prime, transform };
    if dom_a.is_infinite() && left_tangent.slope <= 0.0 {
        return Err(UnurError::error(ErrorKind::SetupInfinite, "left tail of the hat does not decay (slope <= 0 at the leftmost construction point)"));
    }
    pieces.push(Piece { left: dom_a, right: points[0].x, tangent: left_tangent, squeeze: None });

    for i in 0..(n - 1) {
        let p0 = points[i];
        let p1 = points[i + 1];
        let tan0 = Tangent { x0: p0.x, t0: p0.tf, slope: p0.tf_prime, transform };
        let tan1 = Tangent { x0: p1.x, t0: p1.tf, slope: p1.tf_prime, transform };
        let squeeze_slope = (p1.tf - p0.tf) / (p1.x - p0.x);
        let squeeze = Some(Tangent { x0: p0.x, t0: p0.tf, slope: squeeze_slope, transform });

        match variant {
            Variant::Ps => {
                pieces.push(Piece { left: p0.x, right: p1.x, tangent: tan0, squeeze });
            }
            Variant::Gw => {
                // a0 + s0*(x-x0_0) = a1 + s1*(x-x0_1), solved for x.
                let lhs_const = tan0.t0 - tan0.slope * tan0.x0;
                let rhs_const = tan1.t0 - tan1.slope * tan1.x0;
                let mut cross = if (tan0.slope - tan1.slope).abs() > 1e-12 {
                    (rhs_const - lhs_const) / (tan0.slope - tan1.slope)
                } else {
                    0.5 * (p0.x + p1.x)
                };
                if !(cross > p0.x && cross < p1.x) {
                    cross = 0.5 * (p0.x + p1.x);
                }
                pieces.push(Piece { left: p0.x, right: cross, tangent: tan0, squeeze });
                pieces.push(Piece { left: cross, right: p1.x, tangent: tan1, squeeze });
            }
        }
    }

    let right_tangent = Tangent { x0: points[n - 1].x, t0: points[n - 1].tf, slope: points[n - 1].tf_prime, transform };
    if dom_b.is_infinite() && right_tangent.slope >= 0.0 {
        return Err(UnurError::error(ErrorKind::SetupInfinite, "right tail of the hat does not decay (slope >= 0 at the rightmost construction point)"));
    }
    pieces.push(Piece { left: points[n - 1].x, right: dom_b, tangent: right_tangent, squeeze: None });

    Ok(pieces)
}

fn cumulative_areas(pieces: &[Piece]) -> (Vec<f64>, f64) {
    let mut cum = Vec::with_capacity(pieces.len() + 1);
    let mut total = 0.0;
    for p in pieces {
        cum.push(total);
        total += p.tangent.area(p.left, p.right);
    }
    (cum, total)
}

/// Generator object for TDR (SPEC_FULL.md §3.3). Adaptive insertion
/// mutates `points`/`pieces`/`cum`/`guide` from `sample`, which therefore
/// takes `&mut self` (§9: no `RefCell` needed since the crate never
/// exposes `&self` sampling).
pub struct TdrGenerator {
    distr: ContinuousDistribution,
    transform: Transform,
    variant: Variant,
    dom: (f64, f64),
    points: Vec<ConstructionPoint>,
    pieces: Vec<Piece>,
    cum: Vec<f64>,
    total_area: f64,
    guide: GuideTable,
    max_intervals: usize,
    guide_factor: f64,
    verify: bool,
    adaptive: bool,
    adaptive_threshold: f64,
    urng: Box<dyn Urng>,
}

impl TdrGenerator {
    /// Draw one variate (§4.1 sampling contract, steps 1-8).
    pub fn sample(&mut self) -> f64 {
        loop {
            let u = self.urng.next_uniform();
            let scaled = u * self.total_area;
            let i = crate::misc::guide::locate(&self.cum, self.guide.start_index(scaled, self.total_area), scaled);
            let piece = self.pieces[i];
            let local_area = scaled - self.cum[i];
            let x = piece.tangent.invert(piece.left, local_area);
            let hat_x = piece.tangent.hat(x);
            let v = self.urng.next_uniform() * hat_x;

            let squeeze_x = piece.squeeze.map(|s| s.hat(x)).unwrap_or(0.0);
            if v <= squeeze_x {
                self.maybe_verify(x, squeeze_x, hat_x);
                return x;
            }

            let fx = self.distr.pdf(x);
            if v <= fx {
                self.maybe_verify(x, squeeze_x, hat_x);
                return x;
            }

            if self.adaptive && self.pieces.len() < self.max_intervals {
                let ratio = if hat_x > 0.0 { squeeze_x / hat_x } else { 1.0 };
                if ratio < self.adaptive_threshold {
                    self.insert_point(x);
                }
            }
        }
    }

    fn maybe_verify(&self, x: f64, squeeze_x: f64, hat_x: f64) {
        if !self.verify {
            return;
        }
        let fx = self.distr.pdf(x);
        if !(squeeze_x <= fx + 1e-9 && fx <= hat_x + 1e-9) {
            let _ = UnurError::warning(
                ErrorKind::GenConditionViolated,
                format!("squeeze({x})={squeeze_x} <= f({x})={fx} <= hat({x})={hat_x} violated"),
            );
        }
    }

    /// Insert `x` as a new construction point and rebuild the interval
    /// list and guide table (§4.1 step 7). A full rebuild rather than a
    /// local patch: simpler and still bounded by `max_intervals`.
    fn insert_point(&mut self, x: f64) {
        if let Ok(p) = make_point(&self.distr, self.transform, x) {
            if self.points.iter().any(|q| (q.x - p.x).abs() < 1e-12) {
                return;
            }
            let mut points = self.points.clone();
            points.push(p);
            points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
            if check_concavity(&points).is_err() {
                return;
            }
            if let Ok(pieces) = build_pieces(&points, self.dom.0, self.dom.1, self.variant, self.transform) {
                let (cum, total) = cumulative_areas(&pieces);
                let guide_size = ((pieces.len() as f64) * self.guide_factor).ceil().max(1.0) as usize;
                self.guide = GuideTable::build(&cum, total, guide_size);
                self.points = points;
                self.pieces = pieces;
                self.cum = cum;
                self.total_area = total;
                log::record(log::Event::IntervalSplit, format!("tdr: inserted x={x}, now {} intervals", self.pieces.len()));
            }
        }
    }

    pub fn n_intervals(&self) -> usize {
        self.pieces.len()
    }

    pub fn distribution(&self) -> &ContinuousDistribution {
        &self.distr
    }

    /// Rebuild all derived tables after the underlying distribution's
    /// parameters changed (§3.3/§4.5 `reinit`).
    pub fn reinit(&mut self) -> Result<()> {
        let (dom_a, dom_b) = self.distr.domain();
        let xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
        let mut points = Vec::with_capacity(xs.len());
        for x in xs {
            points.push(make_point(&self.distr, self.transform, x)?);
        }
        check_concavity(&points)?;
        let pieces = build_pieces(&points, dom_a, dom_b, self.variant, self.transform)?;
        let (cum, total) = cumulative_areas(&pieces);
        let guide_size = ((pieces.len() as f64) * self.guide_factor).ceil().max(1.0) as usize;
        self.guide = GuideTable::build(&cum, total, guide_size);
        self.dom = (dom_a, dom_b);
        self.points = points;
        self.pieces = pieces;
        self.cum = cum;
        self.total_area = total;
        log::record(log::Event::Reinit, "tdr");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distr::standard::normal;
    use crate::urng::StdUrng;

    #[test]
    fn gw_variant_samples_standard_normal() {
        let d = normal();
        let params = TdrParams::new(d, Box::new(StdUrng::seed_from_u64(1)))
            .variant(Variant::Gw)
            .transform(Transform::Sqrt)
            .construction_points(vec![-1.0, 1.0]);
        let mut gen = params.init().unwrap();
        let n = 200_000;
        let xs: Vec<f64> = (0..n).map(|_| gen.sample()).collect();
        let mean: f64 = xs.iter().sum::<f64>() / n as f64;
        let var: f64 = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert::close(mean, 0.0, 0.02);
        assert::close(var, 1.0, 0.05);
    }

    #[test]
    fn ps_variant_also_samples_standard_normal() {
        let d = normal();
        let params = TdrParams::new(d, Box::new(StdUrng::seed_from_u64(2)))
            .variant(Variant::Ps)
            .transform(Transform::Log)
            .construction_points(vec![-1.0, 1.0]);
        let mut gen = params.init().unwrap();
        let n = 100_000;
        let xs: Vec<f64> = (0..n).map(|_| gen.sample()).collect();
        let mean: f64 = xs.iter().sum::<f64>() / n as f64;
        assert::close(mean, 0.0, 0.03);
    }

    #[test]
    fn rejects_non_concave_construction_points() {
        // A bump (planted kink) breaks T-concavity of an otherwise
        // log-concave surrogate.
        let d = crate::distr::continuous::ContinuousDistribution::new(|x: f64| {
            let base = (-x * x / 2.0).exp();
            if (x - 2.0).abs() < 0.01 { base * 5.0 } else { base }
        })
        .with_dpdf(|x: f64| -x * (-x * x / 2.0).exp())
        .set_domain(f64::NEG_INFINITY, f64::INFINITY)
        .unwrap();
        let params = TdrParams::new(d, Box::new(StdUrng::seed_from_u64(3)))
            .construction_points(vec![-3.0, -1.0, 1.0, 1.9, 2.1, 3.0]);
        assert!(params.init().is_err());
    }

    #[test]
    fn bounded_domain_never_escapes() {
        let d = crate::distr::continuous::ContinuousDistribution::new(|x: f64| 1.0 - (x - 0.5).abs() * 2.0)
            .with_dpdf(|x: f64| if x < 0.5 { 2.0 } else { -2.0 })
            .set_domain(0.0, 1.0)
            .unwrap();
        let params = TdrParams::new(d, Box::new(StdUrng::seed_from_u64(4))).construction_points(vec![0.25, 0.75]);
        let mut gen = params.init().unwrap();
        for _ in 0..10_000 {
            let x = gen.sample();
            assert!((0.0..=1.0).contains(&x));
        }
    }

    #[test]
    fn verify_mode_accepts_well_behaved_density() {
        crate::error::clear();
        let d = normal();
        let params = TdrParams::new(d, Box::new(StdUrng::seed_from_u64(5)))
            .construction_points(vec![-1.0, 1.0])
            .verify(true);
        let mut gen = params.init().unwrap();
        for _ in 0..1000 {
            gen.sample();
        }
        assert!(crate::error::last().is_none());
    }

    #[test]
    fn verify_mode_detects_planted_kink() {
        // A bump between the construction points at 0 and 1 that does not
        // touch either point, so setup's concavity check (which only
        // samples pdf/dpdf at construction points) passes, but the hat
        // built from those points' tangents no longer bounds the density
        // inside the gap (scenario #6).
        crate::error::clear();
        let d = crate::distr::continuous::ContinuousDistribution::new(|x: f64| {
            let base = (-x * x / 2.0).exp();
            if (x - 0.5).abs() < 0.05 { base * 30.0 } else { base }
        })
        .with_dpdf(|x: f64| -x * (-x * x / 2.0).exp())
        .set_domain(f64::NEG_INFINITY, f64::INFINITY)
        .unwrap();
        let params = TdrParams::new(d, Box::new(StdUrng::seed_from_u64(6)))
            .construction_points(vec![-2.0, -1.0, 0.0, 1.0, 2.0])
            .adaptive(false)
            .verify(true);
        let mut gen = params.init().unwrap();
        for _ in 0..20_000 {
            gen.sample();
        }
        assert_eq!(crate::error::last().unwrap().kind(), ErrorKind::GenConditionViolated);
    }
}
