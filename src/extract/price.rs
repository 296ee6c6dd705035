use crate::extract::normalize_spaces;
use crate::ExtractError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Extracts amounts quoted in one currency, e.g. `AED 1,234.56`
///
/// An amount matches only when the currency code is followed by whitespace and a
/// number with exactly two fraction digits. Thousands separators are dropped before
/// parsing.
#[derive(Debug, Clone)]
pub struct PriceParser {
    currency: String,
    pattern: Regex,
}

impl PriceParser {
    /// Builds a parser for the given currency code
    pub fn new(currency: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"\b{}\s+([\d,]+\.\d{{2}})\b",
            regex::escape(currency)
        ))?;

        Ok(Self {
            currency: currency.to_string(),
            pattern,
        })
    }

    /// The currency code this parser looks for
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Extracts the first amount in `text`
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// use shelf_scout::extract::PriceParser;
    ///
    /// let parser = PriceParser::new("AED").unwrap();
    /// assert_eq!(parser.extract("AED 1,234.56 incl. VAT").unwrap(), Decimal::new(123456, 2));
    /// assert!(parser.extract("1,234.56").is_err());
    /// ```
    pub fn extract(&self, text: &str) -> Result<Decimal, ExtractError> {
        let text = normalize_spaces(text);
        let captures = self
            .pattern
            .captures(&text)
            .ok_or(ExtractError::PriceNotFound)?;

        let amount = captures[1].replace(',', "");
        Decimal::from_str(&amount).map_err(|_| ExtractError::InvalidAmount(amount))
    }
}
