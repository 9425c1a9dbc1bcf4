//! # Verhoeff Checksum
//!
//! The check-digit scheme used by Aadhaar numbers. The wizard itself only
//! checks Aadhaar shape; the registration endpoint additionally rejects
//! numbers whose checksum fails or that start with `0` or `1`. Those rules
//! are exposed here so offline transports can mirror the endpoint.

const MULTIPLICATION: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

const PERMUTATION: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 7, 6, 5, 9, 3, 0, 1],
    [2, 7, 9, 3, 8, 0, 1, 5, 4, 6],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

const INVERSE: [u8; 10] = [0, 4, 3, 2, 1, 5, 6, 7, 8, 9];

fn digits_reversed(s: &str) -> Option<Vec<u8>> {
    s.bytes()
        .rev()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect()
}

/// Whether `s` (digits only, check digit last) passes the Verhoeff check.
///
/// Non-digit input never passes.
pub fn validate(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let Some(digits) = digits_reversed(s) else {
        return false;
    };
    let c = digits.iter().enumerate().fold(0u8, |c, (i, d)| {
        MULTIPLICATION[c as usize][PERMUTATION[i % 8][*d as usize] as usize]
    });
    c == 0
}

/// The check digit to append to `s`, or `None` for non-digit input.
pub fn generate(s: &str) -> Option<u8> {
    let digits = digits_reversed(s)?;
    let c = digits.iter().enumerate().fold(0u8, |c, (i, d)| {
        MULTIPLICATION[c as usize][PERMUTATION[(i + 1) % 8][*d as usize] as usize]
    });
    Some(INVERSE[c as usize])
}

/// The endpoint's additional Aadhaar rules, as a user-facing message.
///
/// Returns `None` when the number would be accepted.
pub fn endpoint_rejection(aadhaar: &str) -> Option<&'static str> {
    if !validate(aadhaar) {
        return Some("Invalid Aadhaar number (checksum failed).");
    }
    if aadhaar.starts_with('0') || aadhaar.starts_with('1') {
        return Some("Aadhaar number cannot start with 0 or 1.");
    }
    None
}
