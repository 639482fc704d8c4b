//! Unit conversion

/// Canonical unit names, accepting common spoken aliases
fn canonical(unit: &str) -> Option<&'static str> {
    let unit = match unit {
        "celsius" | "centigrade" | "c" => "celsius",
        "fahrenheit" | "f" => "fahrenheit",
        "pounds" | "pound" | "lbs" | "lb" => "pounds",
        "kilograms" | "kilogram" | "kilos" | "kilo" | "kg" => "kilograms",
        "miles" | "mile" => "miles",
        "kilometers" | "kilometer" | "kilometres" | "kilometre" | "km" => "kilometers",
        "feet" | "foot" | "ft" => "feet",
        "meters" | "meter" | "metres" | "metre" | "m" => "meters",
        "inches" | "inch" | "in" => "inches",
        "centimeters" | "centimeter" | "centimetres" | "centimetre" | "cm" => "centimeters",
        _ => return None,
    };
    Some(unit)
}

/// Convert `value` between two units
///
/// Returns `None` when the pair is not supported.
#[must_use]
pub fn convert(value: f64, from: &str, to: &str) -> Option<f64> {
    let from = canonical(&from.to_lowercase())?;
    let to = canonical(&to.to_lowercase())?;

    let result = match (from, to) {
        ("celsius", "fahrenheit") => value * 9.0 / 5.0 + 32.0,
        ("fahrenheit", "celsius") => (value - 32.0) * 5.0 / 9.0,
        ("pounds", "kilograms") => value * 0.453_592,
        ("kilograms", "pounds") => value / 0.453_592,
        ("miles", "kilometers") => value * 1.609_34,
        ("kilometers", "miles") => value / 1.609_34,
        ("feet", "meters") => value * 0.3048,
        ("meters", "feet") => value / 0.3048,
        ("inches", "centimeters") => value * 2.54,
        ("centimeters", "inches") => value / 2.54,
        (a, b) if a == b => value,
        _ => return None,
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_temperature() {
        assert!(close(convert(100.0, "celsius", "fahrenheit").unwrap(), 212.0));
        assert!(close(convert(32.0, "Fahrenheit", "c").unwrap(), 0.0));
    }

    #[test]
    fn test_mass_and_distance() {
        assert!(close(convert(100.0, "pounds", "kilograms").unwrap(), 45.36));
        assert!(close(convert(10.0, "km", "miles").unwrap(), 6.21));
        assert!(close(convert(3.0, "feet", "meters").unwrap(), 0.91));
        assert!(close(convert(1.0, "inch", "cm").unwrap(), 2.54));
    }

    #[test]
    fn test_unsupported_pairs() {
        assert!(convert(1.0, "pounds", "miles").is_none());
        assert!(convert(1.0, "parsecs", "meters").is_none());
    }
}
