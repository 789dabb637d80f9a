//! Calculation options

use serde::{Deserialize, Serialize};

use crate::utils::rounding::DEFAULT_DECIMALS;

/// Options controlling loading and output of one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcOptions {
    /// Decimals every output figure is rounded to
    pub decimals: u32,
    /// Abort loading on a malformed amount instead of reading it as zero
    pub strict_numbers: bool,
    /// Input CSV files start with a title row
    pub headers: bool,
    /// Equity category carrying forward prior retained earnings; its opening
    /// balance seeds the Retained Result
    pub retained_category: Option<String>,
}

impl Default for CalcOptions {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            strict_numbers: false,
            headers: true,
            retained_category: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_fill_defaults() {
        let options: CalcOptions = serde_json::from_str(r#"{"strict_numbers": true}"#).unwrap();
        assert!(options.strict_numbers);
        assert!(options.headers);
        assert_eq!(options.decimals, 4);
        assert_eq!(options.retained_category, None);
    }
}
