//! Unit multipliers. Internal lengths are millimetres, angles are radians.

/// One millimetre.
pub const MM: f64 = 1.0;
/// One centimetre.
pub const CM: f64 = 10.0 * MM;
/// One metre.
pub const M: f64 = 1000.0 * MM;
/// One degree, in radians.
pub const DEG: f64 = std::f64::consts::PI / 180.0;
