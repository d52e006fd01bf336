//! Fixed linear unit conversions.

pub const KMH_PER_MPH: f64 = 1.60934;
pub const MPH_PER_MS: f64 = 2.236_936;

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * KMH_PER_MPH
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh / KMH_PER_MPH
}

pub fn ms_to_mph(ms: f64) -> f64 {
    ms * MPH_PER_MS
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// -- Tests -------------------------------------------------------------------
