//! Test: deriving `Pseudonymize` on a union should fail.

use tokenmask::Pseudonymize;

#[derive(Pseudonymize)]
union Bits {
    raw: u64,
    halves: [u32; 2],
}

fn main() {}
