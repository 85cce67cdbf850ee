//! Input checks applied before anything reaches the store.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use time::{macros::format_description, Date};

use crate::error::{AppError, AppResult};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref LOGIN_PASSWORD_RE: Regex = Regex::new(r"^.{6,50}$").unwrap();
    static ref NEW_PASSWORD_RE: Regex = Regex::new(r"^.{8,50}$").unwrap();
    static ref SEARCH_RE: Regex = Regex::new(r"^[a-zA-Z0-9\s\-]{0,50}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_login_password(password: &str) -> bool {
    LOGIN_PASSWORD_RE.is_match(password)
}

pub fn is_valid_new_password(password: &str) -> bool {
    NEW_PASSWORD_RE.is_match(password)
}

pub fn is_valid_search(term: &str) -> bool {
    SEARCH_RE.is_match(term)
}

/// Trim and lowercase so lookups hit the unique index consistently.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parse an optional `YYYY-MM-DD` query parameter.
pub fn parse_date_param(name: &str, value: Option<&str>) -> AppResult<Option<Date>> {
    let fmt = format_description!("[year]-[month]-[day]");
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => Date::parse(raw, &fmt)
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid {name}, expected YYYY-MM-DD"))),
    }
}

/// `?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`, both optional and inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    pub fn bounds(&self) -> AppResult<(Option<Date>, Option<Date>)> {
        let start = parse_date_param("start_date", self.start_date.as_deref())?;
        let end = parse_date_param("end_date", self.end_date.as_deref())?;
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("admin@shop.com"));
        assert!(is_valid_email("first.last+pos@sub.example.co"));
        assert!(!is_valid_email("admin@shop"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaces in@shop.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_lengths() {
        assert!(!is_valid_login_password("12345"));
        assert!(is_valid_login_password("123456"));
        assert!(is_valid_login_password(&"x".repeat(50)));
        assert!(!is_valid_login_password(&"x".repeat(51)));

        assert!(!is_valid_new_password("1234567"));
        assert!(is_valid_new_password("12345678"));
    }

    #[test]
    fn search_rejects_sql_metacharacters() {
        assert!(is_valid_search(""));
        assert!(is_valid_search("usb-c charger 20W"));
        assert!(!is_valid_search("'; DROP TABLE products;--"));
        assert!(!is_valid_search("100%"));
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Admin@Shop.COM "), "admin@shop.com");
    }

    #[test]
    fn date_params() {
        assert_eq!(parse_date_param("start_date", None).unwrap(), None);
        assert_eq!(parse_date_param("start_date", Some("  ")).unwrap(), None);
        let d = parse_date_param("start_date", Some("2024-03-09")).unwrap().unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, Month::March, 9));
        let err = parse_date_param("end_date", Some("09/03/2024")).unwrap_err();
        assert!(err.to_string().contains("end_date"));
    }
}
