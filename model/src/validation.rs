//! Client-side form checks run before any request is sent.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ModelError, ModelResult};
use crate::types::{LoginRequest, NewMember};

pub const MIN_ID_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 3;
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;
pub const UPLOAD_EXTENSIONS: &[&str] = &["zip", "pdf"];

/// Checks every sign-up field and returns all failures at once so the form
/// can mark each offending input.
pub fn validate_signup(m: &NewMember) -> Result<(), Vec<ModelError>> {
    let mut errors = Vec::new();
    if m.id.chars().count() < MIN_ID_LEN {
        errors.push(ModelError::validation("id", "ID must be at least 3 characters long."));
    }
    if m.name.trim().is_empty() {
        errors.push(ModelError::validation("name", "Name is required."));
    }
    if !looks_like_email(&m.email) {
        errors.push(ModelError::validation("email", "Please enter a valid email."));
    }
    if m.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ModelError::validation("password", "Password must be at least 3 characters long."));
    }
    if !is_phone_number(&m.phone) {
        errors.push(ModelError::validation("phone", "Phone number is required (digits only)."));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_login(req: &LoginRequest) -> ModelResult<()> {
    if req.id.trim().is_empty() || req.password.is_empty() {
        return Err(ModelError::validation("id", "Please enter your ID and password."));
    }
    Ok(())
}

const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Accepts `something@something.something` anywhere in the input, each part
/// free of whitespace.
pub fn looks_like_email(s: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

pub fn is_phone_number(s: &str) -> bool {
    PHONE_DIGITS.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Rejects anything but `.zip` and `.pdf`, case-insensitively.
pub fn validate_upload_name(name: &str) -> ModelResult<()> {
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext {
        Some(e) if UPLOAD_EXTENSIONS.contains(&e.as_str()) => Ok(()),
        _ => Err(ModelError::validation("file", "Please choose a .zip or .pdf file.")),
    }
}

pub fn validate_category_name(name: &str) -> ModelResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ModelError::validation("name", "Please enter a category name."));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> NewMember {
        NewMember {
            id: "kim".into(),
            password: "pw1".into(),
            name: "Kim".into(),
            email: "kim@example.org".into(),
            phone: "01012345678".into(),
        }
    }

    fn failing_fields(m: &NewMember) -> Vec<String> {
        match validate_signup(m) {
            Ok(()) => vec![],
            Err(errs) => errs
                .into_iter()
                .map(|e| match e {
                    ModelError::Validation { field, .. } => field,
                    other => panic!("unexpected {other:?}"),
                })
                .collect(),
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(validate_signup(&member()).is_ok());
    }

    #[test]
    fn signup_reports_every_bad_field() {
        let m = NewMember { id: "ab".into(), password: "".into(), name: " ".into(), email: "nope".into(), phone: "123".into() };
        assert_eq!(failing_fields(&m), vec!["id", "name", "email", "password", "phone"]);
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.c"));
        assert!(looks_like_email("x a@b.c y"));
        assert!(!looks_like_email("a@.c"));
        assert!(!looks_like_email("a@b."));
        assert!(!looks_like_email("@b.c"));
        assert!(!looks_like_email("a @b.c"));
        assert!(!looks_like_email("a@b c.d"));
        assert!(looks_like_email("a@@b.c"));
        assert!(!looks_like_email(""));
    }

    #[test]
    fn phone_digits_only() {
        assert!(is_phone_number("0101234567"));
        assert!(is_phone_number("010123456789012"));
        assert!(!is_phone_number("010-1234-5678"));
        assert!(!is_phone_number("0101234567890123"));
    }

    #[test]
    fn upload_extension() {
        assert!(validate_upload_name("scan.PDF").is_ok());
        assert!(validate_upload_name("batch.v2.zip").is_ok());
        assert!(validate_upload_name("notes.txt").is_err());
        assert!(validate_upload_name("pdf").is_err());
    }

    #[test]
    fn category_name_trimmed() {
        assert_eq!(validate_category_name("  Tax ").unwrap(), "Tax");
        assert!(validate_category_name("\t").is_err());
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login(&LoginRequest { id: "a".into(), password: "".into() }).is_err());
        assert!(validate_login(&LoginRequest { id: "a".into(), password: "b".into() }).is_ok());
    }
}
