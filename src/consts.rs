//! Mathematical constants

/// The square root of π
pub const SQRT_PI: f64 = 1.772453850905515881919427556567825376987457275391_f64;
/// 0.5 ln(2π)
pub const HALF_LN_2PI: f64 =
    0.918938533204672669540968854562379419803619384766_f64;
/// 0.5 ln(2πe)
pub const HALF_LN_2PI_E: f64 =
    1.418938533204672669540968854562379419803619384766_f64;
/// 0.5 ln(π)
pub const HALF_LN_PI: f64 =
    0.57236494292470008193873809432261623442173004150390625_f64;
/// ln(π)
pub const LN_PI: f64 =
    1.1447298858494001638774761886452324688434600830078125_f64;
/// ln(2π)
pub const LN_2PI: f64 =
    1.83787706640934533908193770912475883960723876953125_f64;
/// Euler-Mascheroni Constant
pub const EULER_MASCERONI: f64 = 0.5772156649015328606065120900824024310421_f64;
/// ln(ln(2))
pub const LN_LN_2: f64 =
    -0.36651292058166432701243915823266946945426344783710526305_f64;
