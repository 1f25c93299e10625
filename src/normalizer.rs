//! Line normalization.
//!
//! Strips the artifacts report exports accumulate: byte-order-mark remnants,
//! line terminators, placeholder dashes around delimiters and quote
//! characters. Normalization is total and pure.

use crate::config::ParserConfig;

/// Removes known export artifacts from a single line
#[derive(Debug, Clone)]
pub struct LineNormalizer {
    bom_artifacts: Vec<String>,
    removed_tokens: Vec<String>,
    quote_char: char,
}

impl LineNormalizer {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            bom_artifacts: config.bom_artifacts.clone(),
            removed_tokens: config.removed_tokens.clone(),
            quote_char: config.quote_char,
        }
    }

    /// Clean one raw line.
    ///
    /// A removal can expose a new token (`"-",` loses its quotes and becomes
    /// `-,`), so the pass is repeated until the line no longer changes. Every
    /// pass only removes characters, which bounds the loop by the line length.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.clean_once(raw);
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_once(&self, line: &str) -> String {
        let mut cleaned = line.to_string();

        for artifact in &self.bom_artifacts {
            remove_all(&mut cleaned, artifact);
        }

        cleaned.retain(|c| c != '\n' && c != '\r');

        for token in &self.removed_tokens {
            remove_all(&mut cleaned, token);
        }

        let quote = self.quote_char;
        cleaned.retain(|c| c != quote);
        cleaned
    }
}

impl Default for LineNormalizer {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

fn remove_all(line: &mut String, token: &str) {
    if line.contains(token) {
        *line = line.replace(token, "");
    }
}
