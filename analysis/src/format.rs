//! Format-specifier classification and the fix-suggestion mapper.

/// The known mtlog format specifiers.
const VALID_FORMATS: &[&str] = &[
    // Zero padding
    "000", "0000", "00000",
    // Fixed point
    "F", "F0", "F1", "F2", "F3", "F4",
    // Percentage
    "P", "P0", "P1", "P2",
    // Exponential
    "E", "E0", "E1", "E2",
    // General
    "G", "G0", "G1", "G2",
    // Hex
    "X", "X2", "X4", "X8", "x", "x2", "x4", "x8",
];

const TIME_FORMAT_PARTS: &[&str] = &["HH", "mm", "ss", "yyyy", "MM", "dd"];

/// Outcome of validating one property's format suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatValidity {
    Valid,
    /// Unknown specifier; an error only in strict mode.
    Unknown(String),
}

/// Validate the format suffix of a raw property (`Name[:format]`).
///
/// A lone digit is not treated as alignment: the known zero-padding forms are
/// `000`/`0000`/`00000`, so a single digit is assumed to be intended padding
/// and stays unknown. Multi-digit runs and `-` followed by digits are
/// alignment and valid.
pub fn validate_format(raw_property: &str) -> FormatValidity {
    let format = match raw_property.split_once(':') {
        Some((_, fmt)) => fmt,
        None => return FormatValidity::Valid,
    };

    if VALID_FORMATS.contains(&format) {
        return FormatValidity::Valid;
    }

    if TIME_FORMAT_PARTS.iter().any(|part| format.contains(part)) {
        return FormatValidity::Valid;
    }

    if is_alignment(format) {
        return FormatValidity::Valid;
    }

    FormatValidity::Unknown(format.to_string())
}

fn is_alignment(format: &str) -> bool {
    let bytes = format.as_bytes();
    match bytes.first() {
        Some(b'-') if bytes.len() > 1 => bytes[1..].iter().all(u8::is_ascii_digit),
        Some(b'1'..=b'9') if bytes.len() >= 2 => bytes[1..].iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// Map a common mistaken specifier to its canonical mtlog form.
///
/// Used by the MTLOG002 fix builder; returns `None` when there is no obvious
/// correction.
pub fn suggest_format(invalid: &str) -> Option<String> {
    if invalid.is_empty() {
        return None;
    }

    // A bare digit run is probably intended zero padding.
    if invalid.bytes().all(|b| b.is_ascii_digit()) {
        let width: usize = invalid.parse().ok()?;
        if width == 0 || width > 10 {
            return None;
        }
        return Some("0".repeat(width));
    }

    let (head, rest) = invalid.split_at(1);
    let digits_ok = rest.is_empty() || rest.bytes().all(|b| b.is_ascii_digit());

    match head {
        // .NET-style numeric specifiers in the wrong case or dialect
        "d" | "D" if digits_ok => {
            if rest.is_empty() {
                Some("000".to_string())
            } else {
                let width: usize = rest.parse().ok()?;
                Some("0".repeat(width.clamp(1, 10)))
            }
        }
        "f" if digits_ok => Some(format!("F{rest}")),
        "p" if digits_ok => Some(format!("P{rest}")),
        "e" if digits_ok => Some(format!("E{rest}")),
        "g" if digits_ok => Some(format!("G{rest}")),
        "h" | "H" if digits_ok => Some(format!("X{rest}")),
        "c" | "C" if rest.is_empty() => Some("F2".to_string()),
        "n" | "N" if rest.is_empty() => Some("F0".to_string()),
        "r" | "R" if rest.is_empty() => Some("G".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown(prop: &str) -> bool {
        matches!(validate_format(prop), FormatValidity::Unknown(_))
    }

    #[test]
    fn no_format_is_valid() {
        assert_eq!(validate_format("UserId"), FormatValidity::Valid);
    }

    #[test]
    fn known_formats_are_valid() {
        for fmt in ["000", "F2", "P0", "E1", "G", "X8", "x4"] {
            assert_eq!(validate_format(&format!("N:{fmt}")), FormatValidity::Valid, "{fmt}");
        }
    }

    #[test]
    fn time_like_formats_are_valid() {
        for fmt in ["HH:mm:ss", "yyyy-MM-dd", "dd/MM"] {
            assert_eq!(validate_format(&format!("When:{fmt}")), FormatValidity::Valid, "{fmt}");
        }
    }

    #[test]
    fn alignment_is_valid() {
        assert_eq!(validate_format("N:-10"), FormatValidity::Valid);
        assert_eq!(validate_format("N:10"), FormatValidity::Valid);
        assert_eq!(validate_format("N:25"), FormatValidity::Valid);
    }

    #[test]
    fn single_digit_is_not_alignment() {
        // Probably intended as zero padding; unknown so strict mode can flag it.
        assert!(unknown("N:3"));
    }

    #[test]
    fn unknown_formats_are_reported() {
        assert_eq!(
            validate_format("V:ZZZ"),
            FormatValidity::Unknown("ZZZ".to_string())
        );
        assert!(unknown("N:-"));
        assert!(unknown("N:F9"));
    }

    #[test]
    fn suggests_canonical_forms() {
        assert_eq!(suggest_format("d"), Some("000".to_string()));
        assert_eq!(suggest_format("d4"), Some("0000".to_string()));
        assert_eq!(suggest_format("f"), Some("F".to_string()));
        assert_eq!(suggest_format("f1"), Some("F1".to_string()));
        assert_eq!(suggest_format("p2"), Some("P2".to_string()));
        assert_eq!(suggest_format("e0"), Some("E0".to_string()));
        assert_eq!(suggest_format("g2"), Some("G2".to_string()));
        assert_eq!(suggest_format("h2"), Some("X2".to_string()));
        assert_eq!(suggest_format("c"), Some("F2".to_string()));
        assert_eq!(suggest_format("n"), Some("F0".to_string()));
        assert_eq!(suggest_format("r"), Some("G".to_string()));
        assert_eq!(suggest_format("3"), Some("000".to_string()));
    }

    #[test]
    fn no_suggestion_for_gibberish() {
        assert_eq!(suggest_format("ZZZ"), None);
        assert_eq!(suggest_format(""), None);
        assert_eq!(suggest_format("0"), None);
    }
}
