//! Test: walking a type that does not implement `SensitiveType` should fail.
//!
//! Leave `SystemTime` unmarked to pass it through unchanged.

use std::time::SystemTime;

use tokenmask::Pseudonymize;

#[derive(Pseudonymize)]
struct Audit {
    #[sensitive]
    at: SystemTime,
}

fn main() {}
