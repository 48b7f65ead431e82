//! Price Parsing
//!
//! Prices arrive as display strings such as `"$12.5"`, `"A$1,299.00"` or
//! `"19.99"`. The currency prefix is any run of non-digit characters, `,`
//! is a thousands separator, and the numeric body is `digits[.digits]`.

/// Error produced when a price string carries no usable amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("no amount in price {0:?}")]
    NoAmount(String),

    #[error("malformed price {0:?}")]
    Invalid(String),
}

/// A price split into its currency prefix and numeric amount
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrice {
    /// Currency prefix as sent by the store (may be empty)
    pub symbol: String,
    pub amount: f64,
}

/// Parse a currency-prefixed price string
pub fn parse_price(raw: &str) -> Result<ParsedPrice, PriceError> {
    let trimmed = raw.trim();

    let first_digit = trimmed
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit())
        .map(|(index, _)| index)
        .ok_or_else(|| PriceError::NoAmount(raw.to_string()))?;

    // ".50" and "$.50" keep the dot, "Rs.50" treats it as part of the symbol
    let prefix = &trimmed[..first_digit];
    let start = match prefix.strip_suffix('.') {
        Some(rest) if !rest.ends_with(|c: char| c.is_alphanumeric()) => first_digit - 1,
        _ => first_digit,
    };

    let body: String = trimmed[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();

    let amount = body
        .parse::<f64>()
        .map_err(|_| PriceError::Invalid(raw.to_string()))?;

    Ok(ParsedPrice {
        symbol: trimmed[..start].trim().to_string(),
        amount,
    })
}

/// Two-decimal display form, e.g. `format_amount(12.5, "$") == "$12.50"`
pub fn format_amount(amount: f64, symbol: &str) -> String {
    format!("{}{:.2}", symbol, amount)
}
