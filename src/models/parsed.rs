//! The parsed, in-memory address produced by component D (§3.2).

use serde::Serialize;

/// Components of a Colombian address parsed from a free-form string.
///
/// `"KR 43 # 57 49"` parses to `street_type="KR"`, `street_name="43"`,
/// `number_prefix="57"`, `number_suffix=Some("49")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAddress {
    pub street_type: String,
    pub street_name: String,
    pub number_prefix: String,
    pub number_suffix: Option<String>,
    /// The original input string, kept for diagnostics (§3.2, §8: `raw == s`).
    pub raw: String,
}

impl ParsedAddress {
    /// `"{street_type} {street_name}"`, e.g. `"KR 43"`.
    pub fn full_street_name(&self) -> String {
        format!("{} {}", self.street_type, self.street_name)
    }

    /// `"{prefix}-{suffix}"` when a suffix is present, else just `{prefix}`.
    pub fn full_number(&self) -> String {
        match &self.number_suffix {
            Some(suffix) => format!("{}-{}", self.number_prefix, suffix),
            None => self.number_prefix.clone(),
        }
    }
}
