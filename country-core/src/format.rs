//! Text formatting for display values.

use crate::model::Coordinates;

/// Groups an integer into comma-separated thousands: `125836021` -> `125,836,021`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Two decimal places, with exact ties rounded away from zero (`12.125` -> `12.13`).
pub fn two_decimals(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

pub fn coordinates(at: &Coordinates) -> String {
    format!("{}, {}", two_decimals(at.latitude), two_decimals(at.longitude))
}

pub fn rainfall(total_mm: f64) -> String {
    format!("{} mm", two_decimals(total_mm))
}

pub fn temperature(average: f64, unit: &str) -> String {
    format!("{} {unit}", two_decimals(average))
}
