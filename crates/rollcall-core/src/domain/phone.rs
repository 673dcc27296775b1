use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix every canonical number starts with.
pub const COUNTRY_PREFIX: &str = "+7";

const SUBSCRIBER_DIGITS: usize = 10;
const TRUNK_DIGIT: char = '8';
const COUNTRY_DIGIT: char = '7';

/// Canonical phone identity: `+7` followed by ten subscriber digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        normalize_phone(raw).ok_or_else(|| CoreError::InvalidPhoneNumber(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Collapses a textual phone rendering into its canonical identity.
///
/// Formatting characters are dropped, an 11-digit number starting with the
/// trunk digit `8` or the country digit `7` loses that digit, and exactly ten
/// remaining digits are prefixed with `+7`. Any other length is rejected.
pub fn normalize_phone(raw: &str) -> Option<PhoneNumber> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits: String = trimmed.chars().filter(|ch| ch.is_ascii_digit()).collect();
    let subscriber = if digits.len() == SUBSCRIBER_DIGITS + 1
        && (digits.starts_with(TRUNK_DIGIT) || digits.starts_with(COUNTRY_DIGIT))
    {
        &digits[1..]
    } else {
        digits.as_str()
    };

    if subscriber.len() != SUBSCRIBER_DIGITS {
        return None;
    }

    let mut out = String::with_capacity(COUNTRY_PREFIX.len() + SUBSCRIBER_DIGITS);
    out.push_str(COUNTRY_PREFIX);
    out.push_str(subscriber);
    Some(PhoneNumber(out))
}

#[cfg(test)]
mod tests {
    use super::{normalize_phone, PhoneNumber};
    use proptest::prelude::*;

    fn normalized(raw: &str) -> Option<String> {
        normalize_phone(raw).map(|phone| phone.as_str().to_string())
    }

    #[test]
    fn normalize_phone_collapses_common_renderings() {
        let expected = Some("+79161234567".to_string());
        assert_eq!(normalized("89161234567"), expected);
        assert_eq!(normalized("79161234567"), expected);
        assert_eq!(normalized("+7-916-123-45-67"), expected);
        assert_eq!(normalized("8 (916) 123-45-67"), expected);
        assert_eq!(normalized("9161234567"), expected);
        assert_eq!(normalized("  +7 916 123 45 67\t"), expected);
    }

    #[test]
    fn normalize_phone_is_idempotent() {
        let once = normalize_phone("8 916 123 45 67").unwrap();
        let twice = normalize_phone(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_phone_rejects_out_of_range_lengths() {
        assert!(normalize_phone("916123456").is_none());
        assert!(normalize_phone("791612345678").is_none());
        assert!(normalize_phone("+1 916 123 45 67").is_none());
        assert!(normalize_phone("123").is_none());
    }

    #[test]
    fn normalize_phone_rejects_empty() {
        assert!(normalize_phone("").is_none());
        assert!(normalize_phone("   ").is_none());
        assert!(normalize_phone("no phone").is_none());
    }

    #[test]
    fn normalize_phone_ignores_non_ascii_digits() {
        assert!(normalize_phone("٩١٦١٢٣٤٥٦٧").is_none());
    }

    #[test]
    fn phone_number_parses_from_str() {
        let phone: PhoneNumber = "8-916-123-45-67".parse().unwrap();
        assert_eq!(phone.to_string(), "+79161234567");
        assert!("12345".parse::<PhoneNumber>().is_err());
    }

    proptest! {
        #[test]
        fn equivalent_renderings_share_one_identity(subscriber in "9[0-9]{9}", pad in "[ \t]{0,3}") {
            let canonical = format!("+7{subscriber}");
            let dashed = format!(
                "+7-{}-{}-{}-{}",
                &subscriber[..3],
                &subscriber[3..6],
                &subscriber[6..8],
                &subscriber[8..]
            );
            let renderings = [
                format!("8{subscriber}"),
                format!("7{subscriber}"),
                dashed,
                format!("{pad}{canonical}{pad}"),
            ];
            for raw in renderings {
                prop_assert_eq!(normalized(&raw), Some(canonical.clone()));
            }
        }

        #[test]
        fn wrong_lengths_never_normalize(digits in "[0-9]{12,15}|[0-9]{1,9}") {
            prop_assert!(normalize_phone(&digits).is_none());
        }
    }
}
