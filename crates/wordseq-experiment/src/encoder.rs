//! Mapping between catalog patterns and the codes written to the artifact.

use shuffle_kernel::{Pattern, PatternCatalog};

use crate::error::ExperimentError;

/// Encodes patterns as the short codes the front-end expects.
#[derive(Debug, Clone)]
pub struct PatternEncoder {
    catalog: PatternCatalog,
    codes: Vec<String>,
}

impl PatternEncoder {
    /// Pair each catalog pattern with the code at the same position.
    ///
    /// Codes must be non-empty, distinct, and free of commas and whitespace
    /// so that a rendered sequence can be split back into codes.
    pub fn new(catalog: PatternCatalog, codes: Vec<String>) -> Result<Self, ExperimentError> {
        if codes.len() != catalog.len() {
            return Err(ExperimentError::InvalidConfig(format!(
                "{} codes for {} patterns",
                codes.len(),
                catalog.len()
            )));
        }

        for (i, code) in codes.iter().enumerate() {
            if code.is_empty() {
                return Err(ExperimentError::InvalidConfig(format!(
                    "empty code for pattern {}",
                    catalog.patterns()[i]
                )));
            }
            if code.contains(|c: char| c == ',' || c.is_whitespace()) {
                return Err(ExperimentError::InvalidConfig(format!(
                    "code {:?} contains a comma or whitespace",
                    code
                )));
            }
            if codes[..i].contains(code) {
                return Err(ExperimentError::InvalidConfig(format!(
                    "code {:?} is used by more than one pattern",
                    code
                )));
            }
        }

        Ok(Self { catalog, codes })
    }

    /// Encode every pattern as its catalog index: "0", "1", ...
    pub fn with_index_codes(catalog: PatternCatalog) -> Self {
        let codes = (0..catalog.len()).map(|i| i.to_string()).collect();
        Self { catalog, codes }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn encode(&self, pattern: &Pattern) -> Result<&str, ExperimentError> {
        self.catalog
            .index_of(pattern)
            .map(|i| self.codes[i].as_str())
            .ok_or(ExperimentError::UnknownPattern(*pattern))
    }

    pub fn encode_all(&self, ordering: &[Pattern]) -> Result<Vec<String>, ExperimentError> {
        ordering
            .iter()
            .map(|p| self.encode(p).map(str::to_string))
            .collect()
    }

    pub fn decode(&self, code: &str) -> Result<Pattern, ExperimentError> {
        self.codes
            .iter()
            .position(|c| c == code)
            .and_then(|i| self.catalog.get(i))
            .ok_or_else(|| ExperimentError::UnknownCode(code.to_string()))
    }

    pub fn decode_all<S: AsRef<str>>(&self, codes: &[S]) -> Result<Vec<Pattern>, ExperimentError> {
        codes.iter().map(|c| self.decode(c.as_ref())).collect()
    }
}

impl Default for PatternEncoder {
    fn default() -> Self {
        Self::with_index_codes(PatternCatalog::default())
    }
}
