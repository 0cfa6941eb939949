//! Client-side form validation.
//!
//! Every rule returns the exact user-facing message on failure. Validation
//! failures short-circuit before any network call; the backend remains the
//! authority and re-validates everything.

pub const PASSWORD_MIN_LEN: usize = 6;
pub const DETAILS_MAX_LEN: usize = 500;

pub fn require(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required.", label))
    } else {
        Ok(())
    }
}

/// Minimal shape check: one `@`, non-empty local part, a dot somewhere in
/// the domain with characters on both sides.
pub fn email(address: &str) -> Result<(), String> {
    let invalid = || "Please enter a valid email address.".to_string();
    let (local, domain) = address.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn password(password: &str) -> Result<(), String> {
    if password.len() < PASSWORD_MIN_LEN {
        Err(format!(
            "Password must be at least {} characters long.",
            PASSWORD_MIN_LEN
        ))
    } else {
        Ok(())
    }
}

pub fn passwords_match(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        Err("Passwords do not match.".to_string())
    } else {
        Ok(())
    }
}

pub fn details(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("Please describe your request.".to_string());
    }
    if text.chars().count() > DETAILS_MAX_LEN {
        return Err(format!(
            "Details must be {} characters or fewer.",
            DETAILS_MAX_LEN
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_blank_and_whitespace() {
        assert!(require("", "Name").is_err());
        assert!(require("   ", "Name").is_err());
        assert!(require("Aminah", "Name").is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(email("a@b.co").is_ok());
        assert!(email("aminah.binti@mymail.edu.my").is_ok());
        assert!(email("no-at-sign").is_err());
        assert!(email("@b.co").is_err());
        assert!(email("a@nodot").is_err());
        assert!(email("a@.co").is_err());
        assert!(email("a@b.").is_err());
        assert!(email("a@b@c.co").is_err());
    }

    #[test]
    fn password_length() {
        assert!(password("12345").is_err());
        assert!(password("123456").is_ok());
    }

    #[test]
    fn confirmation_must_match() {
        assert!(passwords_match("secret1", "secret1").is_ok());
        assert!(passwords_match("secret1", "secret2").is_err());
    }

    #[test]
    fn details_bounds() {
        assert!(details("").is_err());
        assert!(details("need boat rescue").is_ok());
        let long = "x".repeat(DETAILS_MAX_LEN + 1);
        assert!(details(&long).is_err());
        let exact = "x".repeat(DETAILS_MAX_LEN);
        assert!(details(&exact).is_ok());
    }
}
