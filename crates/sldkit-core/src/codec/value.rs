use crate::models::{Dimension, StyleValue, Unit};
use crate::utils::{js_number, parse_finite};

pub fn encode_dimension(d: Dimension) -> String {
    match d.unit {
        Unit::Px => js_number(d.number),
        unit => format!("{}{}", js_number(d.number), unit.as_str()),
    }
}

/// Wire text of a plain value. Pixels are the SLD default and carry no suffix.
pub fn encode_value(value: &StyleValue) -> String {
    match value {
        StyleValue::Dimension(d) => encode_dimension(*d),
        StyleValue::Number(n) => js_number(*n),
        StyleValue::Text(s) => s.clone(),
    }
}

/// Parses wire text into a value: `"2m"` is a dimension in meters, a bare `"2"` a pixel
/// dimension, anything else (colors, names, dash arrays) stays text.
pub fn decode_value(text: &str) -> StyleValue {
    for unit in Unit::ALL {
        if let Some(number) = text.strip_suffix(unit.as_str()).and_then(parse_finite) {
            return StyleValue::Dimension(Dimension::new(number, unit));
        }
    }
    match parse_finite(text) {
        Some(number) => StyleValue::Dimension(Dimension::px(number)),
        None => StyleValue::text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_recognizes_units() {
        assert_eq!(decode_value("2px"), StyleValue::Dimension(Dimension::px(2.0)));
        assert_eq!(
            decode_value("1.5m"),
            StyleValue::Dimension(Dimension::new(1.5, Unit::M))
        );
        assert_eq!(
            decode_value("10ft"),
            StyleValue::Dimension(Dimension::new(10.0, Unit::Ft))
        );
        assert_eq!(decode_value("0.5"), StyleValue::Dimension(Dimension::px(0.5)));
    }

    #[test]
    fn decode_keeps_non_numeric_text() {
        for text in ["#ff0000", "round", "5 2", "circle", "m", "px", "shape://vertline"] {
            assert_eq!(decode_value(text), StyleValue::text(text));
        }
    }

    #[test]
    fn encode_omits_pixel_suffix() {
        assert_eq!(encode_value(&Dimension::px(2.0).into()), "2");
        assert_eq!(encode_value(&Dimension::new(0.5, Unit::M).into()), "0.5m");
        assert_eq!(encode_value(&Dimension::new(3.0, Unit::Ft).into()), "3ft");
        assert_eq!(encode_value(&StyleValue::Number(0.25)), "0.25");
        assert_eq!(encode_value(&StyleValue::text("#000000")), "#000000");
    }
}
