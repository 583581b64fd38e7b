// src/auth.rs
// =============================================================================
// Phone number handling for the SMS login.
//
// People type the nine local digits ("94 351 19 10"), sometimes with the
// country code in front. The API wants "+998943511910".
// =============================================================================

use thiserror::Error;

/// Country code every account number is under.
pub const COUNTRY_CODE: &str = "998";
const LOCAL_DIGITS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("expected 9 digits after +998, got {0}")]
    WrongLength(usize),
}

/// Turns user input into the `+998XXXXXXXXX` form the API expects.
pub fn canonical_phone(input: &str) -> Result<String, PhoneError> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    let local = match digits.strip_prefix(COUNTRY_CODE) {
        Some(rest) if digits.len() == COUNTRY_CODE.len() + LOCAL_DIGITS => rest,
        _ => digits.as_str(),
    };

    if local.len() != LOCAL_DIGITS {
        return Err(PhoneError::WrongLength(local.len()));
    }
    Ok(format!("+{}{}", COUNTRY_CODE, local))
}

/// Groups the local digits as "XX XXX XX XX" for display.
pub fn format_local(input: &str) -> String {
    let mut formatted = String::new();
    for (i, digit) in input.chars().filter(|c| c.is_ascii_digit()).take(LOCAL_DIGITS).enumerate() {
        if i == 2 || i == 5 || i == 7 {
            formatted.push(' ');
        }
        formatted.push(digit);
    }
    formatted
}
