use crate::extract::normalize_spaces;
use crate::ExtractError;
use regex::Regex;
use std::sync::LazyLock;

static MODEL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bModel\s+Number\s*:\s*(\w+)\b").expect("model number pattern is valid")
});

/// Extracts the token following a "Model Number:" label
///
/// # Examples
///
/// ```
/// use shelf_scout::extract::extract_model_number;
///
/// assert_eq!(extract_model_number("Model Number: ABC123").unwrap(), "ABC123");
/// assert!(extract_model_number("SKU: 999").is_err());
/// ```
pub fn extract_model_number(text: &str) -> Result<String, ExtractError> {
    let text = normalize_spaces(text);
    MODEL_NUMBER
        .captures(&text)
        .map(|captures| captures[1].to_string())
        .ok_or(ExtractError::ModelNumberNotFound)
}
