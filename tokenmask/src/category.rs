//! Entity categories: "what kind of sensitive data is this?"
//!
//! A [`Category`] is an open-ended label such as `EMAIL_ADDRESS`. The detector
//! may report any label it likes; the allocator keeps a counter per label.
//!
//! The zero-sized marker types below name the well-known labels at the type
//! level so that `#[sensitive(EmailAddress)]` can tokenize a whole field
//! without a detector.

use std::{borrow::Borrow, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// An entity category label.
///
/// Cheap to clone (the label is shared). Labels are used verbatim as the
/// token prefix, so they should be uppercase to keep tokens distinguishable
/// from ordinary prose.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(Arc<str>);

impl Category {
    /// Creates a category from a label.
    #[must_use]
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Returns the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self(Arc::from(label))
    }
}

/// Categories requested from the detector when none are configured.
pub const DEFAULT_CATEGORIES: [&str; 3] = [
    UsSsn::CATEGORY,
    PhoneNumber::CATEGORY,
    EmailAddress::CATEGORY,
];

/// Marker trait for category types.
///
/// Implement this for zero-sized marker types (unit structs):
///
/// ```rust
/// use tokenmask::Classification;
///
/// #[derive(Clone, Copy)]
/// struct EmployeeId;
///
/// impl Classification for EmployeeId {
///     const CATEGORY: &'static str = "EMPLOYEE_ID";
/// }
/// ```
pub trait Classification {
    /// The label used as the token prefix.
    const CATEGORY: &'static str;

    /// Returns the label as a [`Category`].
    fn category() -> Category {
        Category::new(Self::CATEGORY)
    }
}

/// Email addresses.
#[derive(Clone, Copy)]
pub struct EmailAddress;
impl Classification for EmailAddress {
    const CATEGORY: &'static str = "EMAIL_ADDRESS";
}

/// Phone numbers.
#[derive(Clone, Copy)]
pub struct PhoneNumber;
impl Classification for PhoneNumber {
    const CATEGORY: &'static str = "PHONE_NUMBER";
}

/// US Social Security Numbers.
#[derive(Clone, Copy)]
pub struct UsSsn;
impl Classification for UsSsn {
    const CATEGORY: &'static str = "US_SSN";
}

/// Credit card numbers or PANs.
#[derive(Clone, Copy)]
pub struct CreditCard;
impl Classification for CreditCard {
    const CATEGORY: &'static str = "CREDIT_CARD";
}

/// IP addresses.
#[derive(Clone, Copy)]
pub struct IpAddress;
impl Classification for IpAddress {
    const CATEGORY: &'static str = "IP_ADDRESS";
}

/// Personal names.
#[derive(Clone, Copy)]
pub struct Person;
impl Classification for Person {
    const CATEGORY: &'static str = "PERSON";
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn category_is_looked_up_by_str() {
        let mut counters: HashMap<Category, u64> = HashMap::new();
        counters.insert(Category::from("EMAIL_ADDRESS"), 3);
        assert_eq!(counters.get("EMAIL_ADDRESS"), Some(&3));
    }

    #[test]
    fn category_serializes_as_plain_string() {
        let category = EmailAddress::category();
        assert_eq!(
            serde_json::to_string(&category).unwrap(),
            "\"EMAIL_ADDRESS\""
        );
        let parsed: Category = serde_json::from_str("\"US_SSN\"").unwrap();
        assert_eq!(parsed.as_str(), UsSsn::CATEGORY);
    }

    #[test]
    fn default_categories_match_markers() {
        assert_eq!(DEFAULT_CATEGORIES, ["US_SSN", "PHONE_NUMBER", "EMAIL_ADDRESS"]);
    }
}
