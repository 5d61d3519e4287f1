//! Degrees/minutes/seconds to signed decimal degrees

/// An unsigned rational as stored in GPS tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub num: u32,
    pub den: u32,
}

impl Ratio {
    pub fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Floating-point quotient. A zero denominator yields a non-finite value.
    pub fn to_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl From<(u32, u32)> for Ratio {
    fn from((num, den): (u32, u32)) -> Self {
        Self { num, den }
    }
}

/// Convert a DMS triple plus hemisphere reference to decimal degrees.
///
/// `S` and `W` (either case) negate the result; any other reference leaves
/// it positive. No rounding is applied.
pub fn to_decimal_degrees(degrees: Ratio, minutes: Ratio, seconds: Ratio, hemisphere: char) -> f64 {
    let value = degrees.to_f64() + minutes.to_f64() / 60.0 + seconds.to_f64() / 3600.0;
    match hemisphere.to_ascii_uppercase() {
        'S' | 'W' => -value,
        _ => value,
    }
}
