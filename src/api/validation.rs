//! Input validation for API requests.
//!
//! These are the same rules the mobile client applies before issuing a
//! request; the server applies them again so malformed rows can never land
//! in the store.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Display names: letters (including accented) and spaces, min 2 chars
    static ref NOME_REGEX: Regex = Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ\s]{2,}$").unwrap();

    /// Basic local@domain.tld shape
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// Phone numbers in the fixed (DD)DDDDD-DDDD format
    static ref TELEFONE_REGEX: Regex = Regex::new(r"^\(\d{2}\)\d{5}-\d{4}$").unwrap();
}

/// Validate a display name
pub fn validate_nome(nome: &str) -> Result<(), String> {
    if nome.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if nome.len() > 100 {
        return Err("Name is too long (max 100 characters)".to_string());
    }

    if !NOME_REGEX.is_match(nome) {
        return Err("Name must contain only letters and spaces (min 2 characters)".to_string());
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a password: alphanumeric, min 6 chars, at least one letter and
/// one digit
pub fn validate_senha(senha: &str) -> Result<(), String> {
    if senha.is_empty() {
        return Err("Password is required".to_string());
    }

    if senha.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }

    if !senha.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Password must contain only letters and digits".to_string());
    }

    if !senha.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }

    if !senha.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}

/// Validate a phone number
pub fn validate_telefone(telefone: &str) -> Result<(), String> {
    if telefone.is_empty() {
        return Err("Phone is required".to_string());
    }

    if !TELEFONE_REGEX.is_match(telefone) {
        return Err("Invalid phone. Use the format (00)00000-0000".to_string());
    }

    Ok(())
}

/// Parse a locale-formatted currency string: thousand separators (`.`) are
/// stripped and the decimal comma becomes a decimal point, so "1.500,50"
/// parses to 1500.50.
pub fn parse_valor(valor: &str) -> Option<f64> {
    let normalized = valor.trim().replace('.', "").replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a team-size string, defaulting to 1 when absent or unparseable.
pub fn parse_numero_pessoas(numero_pessoas: Option<&str>) -> i64 {
    numero_pessoas
        .and_then(|n| n.trim().parse::<i64>().ok())
        .unwrap_or(1)
}

/// Presence check matching the original API contract: a missing or empty
/// field is "not provided".
pub fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
