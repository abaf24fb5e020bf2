//! Per-field constraint checks composed into record-level validation.
//!
//! Every validator is a pure function mapping a raw value to either an
//! accepted typed value or a [`Rejection`] carrying a machine-readable
//! code. Record schemas collect rejections from all fields before failing,
//! so a validation error always lists every violated field.

use std::net::IpAddr;
use std::str::FromStr;

use serde::Serialize;

pub const USERNAME_MIN_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PORT_MAX: i64 = 65535;
pub const PAGE_MIN: u32 = 1;
pub const LIMIT_MIN: u32 = 1;
pub const LIMIT_MAX: u32 = 1000;

/// Violation codes surfaced in error responses.
pub mod codes {
    pub const OUT_OF_RANGE: &str = "out_of_range";
    pub const INVALID_VALUE: &str = "invalid_value";
    pub const TOO_SHORT: &str = "too_short";
    pub const MALFORMED: &str = "malformed";
}

/// Why a single raw value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub code: &'static str,
    pub message: String,
}

impl Rejection {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A rejection bound to the field it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: &'static str,
    pub message: String,
}

/// Aggregated validation failure listing every violated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "validation failed on {}: {}",
            self.fields().join(", "),
            self.messages().join("; ")
        )
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    /// True when any violation was recorded against the named field.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Accepts any syntactically valid IPv4 or IPv6 literal. No reachability
/// or reserved-range checks.
pub fn validate_ip(value: &str) -> Result<IpAddr, Rejection> {
    IpAddr::from_str(value).map_err(|_| {
        Rejection::new(
            codes::MALFORMED,
            format!("'{value}' is not a valid IPv4 or IPv6 address"),
        )
    })
}

/// Accepts integers in [0, 65535] inclusive.
pub fn validate_port(value: i64) -> Result<u16, Rejection> {
    if (0..=PORT_MAX).contains(&value) {
        Ok(value as u16)
    } else {
        Err(Rejection::new(
            codes::OUT_OF_RANGE,
            format!("port {value} is outside the range 0-{PORT_MAX}"),
        ))
    }
}

/// Case-insensitive membership check against a fixed allowed set. Returns
/// the canonical member on acceptance; callers keep the original spelling.
pub fn validate_one_of<'a>(value: &str, allowed: &[&'a str]) -> Result<&'a str, Rejection> {
    allowed
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(value))
        .copied()
        .ok_or_else(|| {
            Rejection::new(
                codes::INVALID_VALUE,
                format!("'{}' is not one of: {}", value, allowed.join(", ")),
            )
        })
}

pub fn validate_username(value: &str) -> Result<&str, Rejection> {
    if value.chars().count() < USERNAME_MIN_LEN {
        Err(Rejection::new(
            codes::TOO_SHORT,
            format!("username must be at least {USERNAME_MIN_LEN} characters long"),
        ))
    } else {
        Ok(value)
    }
}

pub fn validate_password(value: &str) -> Result<&str, Rejection> {
    if value.chars().count() < PASSWORD_MIN_LEN {
        Err(Rejection::new(
            codes::TOO_SHORT,
            format!("password must be at least {PASSWORD_MIN_LEN} characters long"),
        ))
    } else {
        Ok(value)
    }
}

/// Structural email check: one '@' with a non-empty local part and a
/// domain containing a dot.
pub fn validate_email(value: &str) -> Result<&str, Rejection> {
    let malformed = || {
        Rejection::new(
            codes::MALFORMED,
            format!("'{value}' is not a valid email address"),
        )
    };

    let (local, domain) = value.split_once('@').ok_or_else(malformed)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(malformed());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(malformed)?;
    if host.is_empty() || tld.is_empty() || value.contains(char::is_whitespace) {
        return Err(malformed());
    }
    Ok(value)
}

/// Collects field violations across a whole record before failing.
#[derive(Debug, Default)]
pub struct Violations {
    items: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the rejection (if any) under `field` and hands back the
    /// accepted value otherwise.
    pub fn capture<T>(&mut self, field: &str, result: Result<T, Rejection>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(rejection) => {
                self.items.push(FieldViolation {
                    field: field.to_string(),
                    code: rejection.code,
                    message: rejection.message,
                });
                None
            }
        }
    }

    /// Records a violation directly, for checks that do not go through a
    /// field validator function.
    pub fn reject(&mut self, field: &str, code: &'static str, message: impl Into<String>) {
        self.items.push(FieldViolation {
            field: field.to_string(),
            code,
            message: message.into(),
        });
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.items,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ACTIONS, PROTOCOLS, SEVERITIES};

    #[test]
    fn test_port_boundaries() {
        assert_eq!(validate_port(0), Ok(0));
        assert_eq!(validate_port(65535), Ok(65535));
        assert_eq!(validate_port(80), Ok(80));

        let err = validate_port(70000).unwrap_err();
        assert_eq!(err.code, codes::OUT_OF_RANGE);
        assert!(validate_port(-1).is_err());
    }

    #[test]
    fn test_ip_literals() {
        assert!(validate_ip("192.168.1.100").is_ok());
        assert!(validate_ip("10.0.0.1").is_ok());
        assert!(validate_ip("fe80::1").is_ok());
        assert!(validate_ip("2001:0db8:85a3:0000:0000:8a2e:0370:7334").is_ok());

        assert!(validate_ip("not-an-ip").is_err());
        assert!(validate_ip("256.1.1.1").is_err());
        assert!(validate_ip("").is_err());
    }

    #[test]
    fn test_enum_membership_is_case_insensitive() {
        for value in ["TCP", "tcp", "Udp", "icmp"] {
            assert!(validate_one_of(value, PROTOCOLS).is_ok(), "{value}");
        }
        assert_eq!(validate_one_of("tcp", PROTOCOLS), Ok("TCP"));
        assert_eq!(validate_one_of("deny", ACTIONS), Ok("DENY"));
        assert_eq!(validate_one_of("CRITICAL", SEVERITIES), Ok("critical"));

        let err = validate_one_of("INVALID", PROTOCOLS).unwrap_err();
        assert_eq!(err.code, codes::INVALID_VALUE);
        assert!(validate_one_of("INVALID", ACTIONS).is_err());
        assert!(validate_one_of("INVALID", SEVERITIES).is_err());
    }

    #[test]
    fn test_username_length() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_email_structure() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("a.b@sub.example.org").is_ok());

        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user name@example.com").is_err());
    }

    #[test]
    fn test_violations_aggregate_all_fields() {
        let mut violations = Violations::new();
        violations.capture("source_port", validate_port(70000));
        violations.capture("protocol", validate_one_of("INVALID", PROTOCOLS));
        violations.capture("action", validate_one_of("ALLOW", ACTIONS));

        let err = violations.into_result().unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.has_field("source_port"));
        assert!(err.has_field("protocol"));
        assert!(!err.has_field("action"));
    }
}
