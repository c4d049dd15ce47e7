//! Bangladeshi mobile number rules.

const COUNTRY_PREFIX: &str = "+880";
const SUBSCRIBER_DIGITS: usize = 10;

/// `+880` followed by exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone
        .strip_prefix(COUNTRY_PREFIX)
        .is_some_and(|rest| rest.len() == SUBSCRIBER_DIGITS && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Keep the first six and last four characters, e.g. `+88017***0000`.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 10 {
        return "***".to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}
