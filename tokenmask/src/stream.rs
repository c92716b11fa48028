//! Restoring original values in text that arrives in fragments.
//!
//! The decoder holds back the trailing `threshold` bytes of everything it has
//! seen, where `threshold` is the length of the longest token. Any token that
//! is still incomplete must lie inside that tail. The release point is then
//! pulled back past every complete token that straddles it, repeating until no
//! token does, so the released prefix never ends partway through a token.
//!
//! Fragments must be fed in the order they were produced.

use crate::{decoder::Restorer, error::Result, mapping::Mapping};

/// Incremental token restorer for one response stream.
///
/// ```rust
/// use tokenmask::{Mapping, StreamingDecoder};
///
/// let mapping: Mapping = [("EMAIL_ADDRESS_0001", "a@b.com")].into_iter().collect();
/// let mut decoder = StreamingDecoder::new(&mapping)?;
///
/// let mut out = String::new();
/// for fragment in ["Contact ", "EMAIL_", "ADDRESS_", "0001 now"] {
///     out.push_str(&decoder.process_fragment(fragment));
/// }
/// out.push_str(&decoder.finalize());
/// assert_eq!(out, "Contact a@b.com now");
/// # Ok::<(), tokenmask::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct StreamingDecoder {
    restorer: Restorer,
    tokens: Vec<String>,
    threshold: usize,
    buffer: String,
}

impl StreamingDecoder {
    /// Creates a decoder for `mapping`.
    ///
    /// With an empty mapping the threshold is zero and every fragment passes
    /// straight through.
    pub fn new(mapping: &Mapping) -> Result<Self> {
        Ok(Self {
            restorer: Restorer::new(mapping)?,
            tokens: mapping
                .tokens()
                .filter(|token| !token.is_empty())
                .map(str::to_owned)
                .collect(),
            threshold: mapping.longest_token_len(),
            buffer: String::new(),
        })
    }

    /// Bytes always held back: the length of the longest token.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Bytes received but not yet released.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Feeds the next fragment and returns whatever is now safe to show,
    /// with tokens restored. The result is often empty.
    pub fn process_fragment(&mut self, fragment: &str) -> String {
        if fragment.is_empty() {
            return String::new();
        }
        self.buffer.push_str(fragment);
        if self.buffer.len() <= self.threshold {
            return String::new();
        }

        let cut = self.safe_cut();
        if cut == 0 {
            return String::new();
        }
        let rest = self.buffer.split_off(cut);
        let safe = std::mem::replace(&mut self.buffer, rest);
        self.restorer.restore(&safe)
    }

    /// Releases everything still buffered, with tokens restored.
    ///
    /// Consumes the decoder: a stream is finalized exactly once.
    pub fn finalize(self) -> String {
        self.restorer.restore(&self.buffer)
    }

    fn safe_cut(&self) -> usize {
        let mut cut = floor_char_boundary(&self.buffer, self.buffer.len() - self.threshold);
        while let Some(start) = self.straddling_token_start(cut) {
            cut = start;
        }
        cut
    }

    /// Start of a complete token occurrence that begins before `cut` and ends
    /// after it, if any.
    fn straddling_token_start(&self, cut: usize) -> Option<usize> {
        let bytes = self.buffer.as_bytes();
        self.tokens.iter().find_map(|token| {
            let token = token.as_bytes();
            (1..token.len().min(cut + 1)).find_map(|prefix_len| {
                let start = cut - prefix_len;
                let (head, tail) = token.split_at(prefix_len);
                (bytes[start..cut] == *head && bytes[cut..].starts_with(tail)).then_some(start)
            })
        })
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
