// Number and text formatting shared by the SVG writer and the curve generators.

use std::fmt::Write as _;

/// Attribute number: shortest decimal that round-trips, snapped to the nearest integer when
/// layout arithmetic left it within 1e-6 of one. Non-finite values and `-0` print as `0`.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let snapped = match v.round() {
        r if (v - r).abs() < 1e-6 => r,
        _ => v,
    };
    if snapped == 0.0 {
        "0".to_string()
    } else {
        snapped.to_string()
    }
}

/// Path coordinate: `Math.round(v * 1000) / 1000`, so halves go towards +inf.
pub(crate) fn fmt_path_into(out: &mut String, v: f64) {
    let thousandths = (v * 1000.0 + 0.5).floor();
    if !thousandths.is_finite() || thousandths == 0.0 {
        out.push('0');
        return;
    }
    let _ = write!(out, "{}", thousandths / 1000.0);
}

pub(crate) fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(v: f64) -> String {
        let mut out = String::new();
        fmt_path_into(&mut out, v);
        out
    }

    #[test]
    fn fmt_drops_float_noise_and_negative_zero() {
        assert_eq!(fmt(0.0), "0");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(1e-12), "0");
        assert_eq!(fmt(319.99999999), "320");
        assert_eq!(fmt(-160.0), "-160");
        assert_eq!(fmt(12.5), "12.5");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn path_numbers_round_to_three_decimals() {
        assert_eq!(path(1.0), "1");
        assert_eq!(path(1.23456), "1.235");
        assert_eq!(path(0.1), "0.1");
        assert_eq!(path(-2.5), "-2.5");
        assert_eq!(path(-0.0004), "0");
        assert_eq!(path(106.66666666), "106.667");
        // Ties round towards +inf, like `Math.round`.
        assert_eq!(path(1.0625), "1.063");
        assert_eq!(path(-1.0625), "-1.062");
        assert_eq!(path(f64::INFINITY), "0");
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<x y=\"1\">"), "&lt;x y=&quot;1&quot;&gt;");
        assert_eq!(escape_xml("it's"), "it&#39;s");
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(escape_xml(""), "");
    }
}
