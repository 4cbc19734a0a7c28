//! Presentation helpers shared by the front ends.
//!
//! Computation keeps full precision; rounding happens here, at the edge.

/// Round to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal string, or `N/A` for NaN and infinities.
pub fn fmt2(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", round2(value))
    } else {
        "N/A".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(-0.166_666), -0.17);
        assert_eq!(round2(0.782_608), 0.78);
    }

    #[test]
    fn non_finite_renders_as_na() {
        assert_eq!(fmt2(f64::NAN), "N/A");
        assert_eq!(fmt2(f64::INFINITY), "N/A");
        assert_eq!(fmt2(1.005_1), "1.01");
    }
}
