//! Format rules for the identity and contact numbers carried by an application.

/// Primary identifier (PAN): five letters, four digits, one letter.
/// Letters are matched case-insensitively.
pub fn is_valid_pan(value: &str) -> bool {
    let bytes = value.trim().as_bytes();
    bytes.len() == 10
        && bytes[..5].iter().all(u8::is_ascii_alphabetic)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_alphabetic()
}

/// Secondary identifier (Aadhaar): exactly twelve ASCII digits.
pub fn is_valid_aadhaar(value: &str) -> bool {
    let value = value.trim();
    value.len() == 12 && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn normalize_pan(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Mobile number: exactly ten ASCII digits.
pub fn is_valid_mobile(value: &str) -> bool {
    let value = value.trim();
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn mask_mobile(value: &str) -> Option<String> {
    if !is_valid_mobile(value) {
        return None;
    }
    Some(format!("XXXXXX{}", &value.trim()[6..]))
}

/// Masks all but the last four digits, e.g. `XXXX-XXXX-1234`.
pub fn mask_aadhaar(value: &str) -> Option<String> {
    if !is_valid_aadhaar(value) {
        return None;
    }
    let value = value.trim();
    Some(format!("XXXX-XXXX-{}", &value[8..]))
}
