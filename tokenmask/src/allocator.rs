//! Placeholder token allocation.
//!
//! Tokens have the shape `CATEGORY_NNNN`: the category label, an underscore,
//! and a per-category counter zero-padded to [`TOKEN_DIGITS`] digits.

use std::collections::HashMap;

use crate::category::Category;

/// Minimum width of the numeric token suffix.
pub const TOKEN_DIGITS: usize = 4;

/// Mints unique placeholder tokens from per-category counters.
///
/// Counters start at zero, are bumped once per minted token and never go
/// down, so every token an allocator hands out is unique for its lifetime.
/// Reuse one allocator for every message of a request (system prompt and user
/// prompt) so their mappings can be merged without collisions.
///
/// The allocator is not synchronized. Share it behind a `Mutex` or give each
/// session its own.
#[derive(Clone, Debug, Default)]
pub struct PlaceholderAllocator {
    counters: HashMap<Category, u64>,
}

impl PlaceholderAllocator {
    /// Creates an allocator with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh token for `category` and bumps its counter.
    pub fn allocate(&mut self, category: &str) -> String {
        let next = match self.counters.get_mut(category) {
            Some(counter) => {
                *counter += 1;
                *counter
            }
            None => {
                self.counters.insert(Category::new(category), 1);
                1
            }
        };
        format_token(category, next)
    }

    /// Returns how many tokens have been minted for `category`.
    pub fn counter(&self, category: &str) -> u64 {
        self.counters.get(category).copied().unwrap_or(0)
    }

    /// Iterates over every category seen so far with its counter.
    pub fn counters(&self) -> impl Iterator<Item = (&Category, u64)> + '_ {
        self.counters.iter().map(|(category, count)| (category, *count))
    }
}

fn format_token(category: &str, counter: u64) -> String {
    format!("{category}_{counter:0width$}", width = TOKEN_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_token_is_zero_padded() {
        let mut allocator = PlaceholderAllocator::new();
        assert_eq!(allocator.allocate("US_SSN"), "US_SSN_0001");
        assert_eq!(allocator.counter("US_SSN"), 1);
    }

    #[test]
    fn counters_are_scoped_per_category() {
        let mut allocator = PlaceholderAllocator::new();
        assert_eq!(allocator.allocate("EMAIL_ADDRESS"), "EMAIL_ADDRESS_0001");
        assert_eq!(allocator.allocate("PHONE_NUMBER"), "PHONE_NUMBER_0001");
        assert_eq!(allocator.allocate("EMAIL_ADDRESS"), "EMAIL_ADDRESS_0002");
        assert_eq!(allocator.counter("PHONE_NUMBER"), 1);
        assert_eq!(allocator.counter("PERSON"), 0);
    }

    #[test]
    fn suffix_strictly_increases() {
        let mut allocator = PlaceholderAllocator::new();
        let mut previous = 0;
        for _ in 0..50 {
            let token = allocator.allocate("PERSON");
            let suffix: u64 = token.rsplit('_').next().unwrap().parse().unwrap();
            assert!(suffix > previous);
            previous = suffix;
        }
    }

    #[test]
    fn counters_past_padding_width_keep_growing() {
        let mut allocator = PlaceholderAllocator::new();
        allocator.counters.insert(Category::new("PERSON"), 9_999);
        assert_eq!(allocator.allocate("PERSON"), "PERSON_10000");
    }

    #[test]
    fn unknown_categories_are_accepted() {
        let mut allocator = PlaceholderAllocator::new();
        assert_eq!(allocator.allocate("MEDICAL_RECORD_ID"), "MEDICAL_RECORD_ID_0001");
        assert_eq!(allocator.counters().count(), 1);
    }
}
