use thiserror::Error;

/// Money is represented as integer cents (chhertum) to avoid floating-point
/// precision issues. Nu 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", 1 -> "0.01"
pub fn format_cents(cents: Cents) -> String {
    let units = cents / 100;
    let remainder = (cents % 100).abs();
    if cents < 0 && units == 0 {
        format!("-0.{:02}", remainder)
    } else {
        format!("{}.{:02}", units, remainder)
    }
}

/// Format cents with the ngultrum currency label, for receipts and prompts.
/// Example: 50000 -> "Ngultrum 500.00"
pub fn format_ngultrum(cents: Cents) -> String {
    format!("Ngultrum {}", format_cents(cents))
}

/// Parse a decimal amount string into cents.
/// Example: "500" -> 50000, "12.5" -> 1250, "0.01" -> 1
pub fn parse_amount(input: &str) -> Result<Cents, ParseAmountError> {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (units_str, frac_str) = match digits.split_once('.') {
        Some((units, frac)) => (units, frac),
        None => (digits, ""),
    };

    if units_str.is_empty() && frac_str.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    if frac_str.len() > 2 {
        return Err(ParseAmountError::TooManyDecimals);
    }
    // Digits only on both sides: an embedded sign in the fraction
    // ("1.-5") would otherwise parse as a different amount
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !frac_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseAmountError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        // Digits already validated, so the only parse failure left is
        // a value that does not fit in i64
        units_str
            .parse()
            .map_err(|_| ParseAmountError::AmountTooLarge)?
    };

    let frac: i64 = if frac_str.is_empty() {
        0
    } else {
        let parsed: i64 = frac_str
            .parse()
            .map_err(|_| ParseAmountError::InvalidFormat)?;
        // A single decimal digit means tens of cents: "12.5" is 12.50
        if frac_str.len() == 1 { parsed * 10 } else { parsed }
    };

    let cents = units
        .checked_mul(100)
        .and_then(|scaled| scaled.checked_add(frac))
        .ok_or(ParseAmountError::AmountTooLarge)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("invalid amount format")]
    InvalidFormat,
    #[error("amounts carry at most two decimal places")]
    TooManyDecimals,
    #[error("amount is too large")]
    AmountTooLarge,
}
