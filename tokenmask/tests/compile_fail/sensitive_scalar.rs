//! Test: marking a scalar field `#[sensitive]` should fail.
//!
//! A token is text, so an integer field has nowhere to hold one.

use tokenmask::Pseudonymize;

#[derive(Pseudonymize)]
struct Invoice {
    #[sensitive]
    total_cents: u64,
}

fn main() {}
