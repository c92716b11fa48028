//! Restoring original values in complete text.

use aho_corasick::{AhoCorasick, MatchKind};

use crate::{error::Result, mapping::Mapping};

/// A compiled, reusable token replacer for one mapping.
///
/// Every literal occurrence of every token is replaced in a single
/// left-to-right pass. Where tokens overlap (`ADDRESS_0001` inside
/// `EMAIL_ADDRESS_0001`) the leftmost, then longest, occurrence wins.
/// Restored values are never re-scanned, so a value that happens to look like
/// a token is left alone.
#[derive(Clone, Debug)]
pub struct Restorer {
    matcher: Option<AhoCorasick>,
    originals: Vec<String>,
}

impl Restorer {
    /// Compiles the tokens of `mapping`. Empty tokens are ignored.
    pub fn new(mapping: &Mapping) -> Result<Self> {
        let (tokens, originals): (Vec<&str>, Vec<String>) = mapping
            .iter()
            .filter(|(token, _)| !token.is_empty())
            .map(|(token, original)| (token, original.to_owned()))
            .unzip();
        if tokens.is_empty() {
            return Ok(Self {
                matcher: None,
                originals,
            });
        }
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&tokens)?;
        Ok(Self {
            matcher: Some(matcher),
            originals,
        })
    }

    /// Returns `text` with every token replaced by its original value.
    pub fn restore(&self, text: &str) -> String {
        match &self.matcher {
            Some(matcher) if !text.is_empty() => matcher.replace_all(text, &self.originals),
            _ => text.to_owned(),
        }
    }
}

/// Replaces every token of `mapping` found in `text` with its original value.
///
/// Empty text or an empty mapping return `text` unchanged. Build a
/// [`Restorer`] instead when restoring many texts against one mapping.
pub fn restore(text: &str, mapping: &Mapping) -> Result<String> {
    if text.is_empty() || mapping.is_empty() {
        return Ok(text.to_owned());
    }
    Ok(Restorer::new(mapping)?.restore(text))
}
