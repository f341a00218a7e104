use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Whitespace and unit glyphs dropped before reading a magnitude
    static ref UNIT_GLYPHS: Regex = Regex::new(r"[\sΩVAFH]").unwrap();
}

/// SI multiplier letters, scanned in this order
const SI_PREFIXES: [(char, f64); 8] = [
    ('p', 1e-12),
    ('n', 1e-9),
    ('u', 1e-6),
    ('m', 1e-3),
    ('k', 1e3),
    ('K', 1e3),
    ('M', 1e6),
    ('G', 1e9),
];

/// Parse a component value such as `"4.7k"`, `"100nF"` or `"12 V"`.
///
/// The first prefix letter present anywhere in the text is removed and its
/// multiplier applied; if the remainder still does not parse the next letter
/// is tried, then the bare text. Anything unreadable is 0.0.
pub fn parse_value(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let cleaned = UNIT_GLYPHS.replace_all(text, "");

    for (letter, multiplier) in SI_PREFIXES {
        if cleaned.contains(letter) {
            if let Ok(magnitude) = cleaned.replace(letter, "").parse::<f64>() {
                return magnitude * multiplier;
            }
        }
    }

    cleaned.parse::<f64>().unwrap_or(0.0)
}
