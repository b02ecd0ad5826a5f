//! User input checks run before anything is sent to the backend

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::models::Credentials;

const INVALID_AMOUNT: &str = "Please enter a valid amount greater than 0";

/// Leading decimal literal, parsed the way a lenient numeric field would:
/// `"12abc"` reads as 12, `".5"` as 0.5.
fn leading_number(text: &str) -> Option<f64> {
    static NUMBER_PREFIX: OnceCell<Regex> = OnceCell::new();
    let pattern = NUMBER_PREFIX
        .get_or_init(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)").expect("valid number pattern"));

    pattern
        .find(text.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Parse an amount for a deposit, withdrawal or transfer
pub fn parse_amount_input(text: &str) -> CoreResult<f64> {
    match leading_number(text) {
        Some(amount) if amount > 0.0 => Ok(amount),
        _ => Err(CoreError::validation(INVALID_AMOUNT)),
    }
}

/// A withdrawal may not exceed the known balance; an unknown balance counts as zero
pub fn validate_withdrawal(amount: f64, balance: Option<f64>) -> CoreResult<()> {
    if amount > balance.unwrap_or(0.0) {
        return Err(CoreError::validation("Insufficient balance"));
    }
    Ok(())
}

pub fn validate_credentials(credentials: &Credentials) -> CoreResult<()> {
    if credentials.username.trim().is_empty() {
        return Err(CoreError::validation("Username is required"));
    }
    if credentials.password.is_empty() {
        return Err(CoreError::validation("Password is required"));
    }
    Ok(())
}

/// Amount typed into the history filter. Everything but digits and `.` is
/// dropped first, so `"KWD 1,250"` filters on 1250. Unparseable input means
/// "no amount criterion".
pub fn sanitize_amount_filter(text: &str) -> Option<f64> {
    static NON_NUMERIC: OnceCell<Regex> = OnceCell::new();
    let pattern = NON_NUMERIC.get_or_init(|| Regex::new(r"[^0-9.]").expect("valid strip pattern"));

    let cleaned = pattern.replace_all(text, "");
    leading_number(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_input() {
        assert_eq!(parse_amount_input("25").unwrap(), 25.0);
        assert_eq!(parse_amount_input(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_amount_input("12abc").unwrap(), 12.0);
        assert_eq!(parse_amount_input(".5").unwrap(), 0.5);
    }

    #[test]
    fn test_parse_amount_input_rejects() {
        for bad in ["", "abc", "0", "-5", "0.0"] {
            let err = parse_amount_input(bad).unwrap_err();
            assert_eq!(err.to_string(), INVALID_AMOUNT, "input {:?}", bad);
        }
    }

    #[test]
    fn test_validate_withdrawal() {
        assert!(validate_withdrawal(50.0, Some(100.0)).is_ok());
        assert!(validate_withdrawal(100.0, Some(100.0)).is_ok());
        let err = validate_withdrawal(100.01, Some(100.0)).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient balance");
        assert!(validate_withdrawal(1.0, None).is_err());
    }

    #[test]
    fn test_validate_credentials() {
        let ok = Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        assert!(validate_credentials(&ok).is_ok());

        let no_user = Credentials {
            username: "  ".to_string(),
            ..ok.clone()
        };
        assert_eq!(validate_credentials(&no_user).unwrap_err().to_string(), "Username is required");

        let no_pass = Credentials {
            password: String::new(),
            ..ok
        };
        assert_eq!(validate_credentials(&no_pass).unwrap_err().to_string(), "Password is required");
    }

    #[test]
    fn test_sanitize_amount_filter() {
        assert_eq!(sanitize_amount_filter("50"), Some(50.0));
        assert_eq!(sanitize_amount_filter("$1,250.75"), Some(1250.75));
        assert_eq!(sanitize_amount_filter("-30"), Some(30.0));
        assert_eq!(sanitize_amount_filter("1.2.3"), Some(1.2));
        assert_eq!(sanitize_amount_filter(""), None);
        assert_eq!(sanitize_amount_filter("abc"), None);
        assert_eq!(sanitize_amount_filter("."), None);
    }
}
