//! Text helpers shared by models, controllers and the db layer.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Phone numbers: optional leading `+`, 9 to 15 digits.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?1?\d{9,15}$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Normalize an email for storage: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Turn arbitrary text into a URL slug: lowercase alphanumeric runs joined
/// by single dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Format a price with thousands separators, dropping the fractional part.
pub fn format_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let whole = value.abs().round() as u64;
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Marina Vista Tower"), "marina-vista-tower");
        assert_eq!(slugify("  Palm -- Jumeirah!  "), "palm-jumeirah");
        assert_eq!(slugify("3BR Duplex, JVC"), "3br-duplex-jvc");
    }

    #[test]
    fn slugify_never_starts_or_ends_with_dash() {
        assert_eq!(slugify("--hello--"), "hello");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("buyer@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("+971569599966"));
        assert!(is_valid_phone("0501234567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("call me"));
    }

    #[test]
    fn thousands_formatting() {
        assert_eq!(format_thousands(2_450_000.0), "2,450,000");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
    }
}
