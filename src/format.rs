//! Display strings for stored areas and lengths, Indonesian convention:
//! `.` groups thousands, `,` separates decimals.

use thousands::Separable;

pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;
pub const METERS_PER_KILOMETER: f64 = 1_000.0;

/// `"-"` for missing, zero or NaN areas; hectares from one hectare up.
pub fn format_area(area: impl Into<Option<f64>>) -> String {
    let area = match area.into() {
        Some(a) if a != 0.0 && !a.is_nan() => a,
        _ => return "-".to_string(),
    };
    if area >= SQUARE_METERS_PER_HECTARE {
        format!("{} ha", decimal_id(area / SQUARE_METERS_PER_HECTARE, 2))
    } else {
        format!("{} m²", decimal_id(area, 0))
    }
}

/// Kilometers from 1000 m up, with a plain `.` decimal point.
pub fn format_length(length: f64) -> String {
    if length.is_nan() {
        return "-".to_string();
    }
    if length >= METERS_PER_KILOMETER {
        format!("{:.2} km", length / METERS_PER_KILOMETER)
    } else {
        format!("{:.0} m", length.round() + 0.0)
    }
}

fn decimal_id(value: f64, decimals: usize) -> String {
    if decimals == 0 {
        // + 0.0 turns -0.0 into 0.0
        return format!("{:.0}", value.round() + 0.0).separate_with_dots();
    }
    let fixed = format!("{:.*}", decimals, value);
    match fixed.split_once('.') {
        Some((int, frac)) => format!("{},{}", int.separate_with_dots(), frac),
        None => fixed.separate_with_dots(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_area() {
        assert_eq!(format_area(0.0), "-");
        assert_eq!(format_area(None), "-");
        assert_eq!(format_area(f64::NAN), "-");
    }

    #[test]
    fn test_hectares() {
        assert_eq!(format_area(15000.0), "1,50 ha");
        assert_eq!(format_area(10000.0), "1,00 ha");
        assert_eq!(format_area(282743.34), "28,27 ha");
        assert_eq!(format_area(12_345_678_900.0), "1.234.567,89 ha");
    }

    #[test]
    fn test_square_meters() {
        assert_eq!(format_area(9999.0), "9.999 m²");
        assert_eq!(format_area(999.4), "999 m²");
        assert_eq!(format_area(1234.5), "1.235 m²");
        assert_eq!(format_area(Some(12.0)), "12 m²");
        assert_eq!(format_area(-0.3), "0 m²");
    }

    #[test]
    fn test_length() {
        assert_eq!(format_length(500.0), "500 m");
        assert_eq!(format_length(1500.0), "1.50 km");
        assert_eq!(format_length(0.0), "0 m");
        assert_eq!(format_length(12.6), "13 m");
        assert_eq!(format_length(1000.0), "1.00 km");
        assert_eq!(format_length(-0.3), "0 m");
    }
}
