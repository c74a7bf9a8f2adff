//! Small helpers shared across the SDK.

use std::fmt;

/// Masks a credential value when printed through `Debug`.
///
/// Values of 12 characters or more keep their first and last three characters
/// so that two different keys stay distinguishable in logs; shorter values
/// are masked entirely. An empty value prints as `EMPTY`, which makes a
/// misconfigured credential visible at a glance.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or(""))
    }
}

impl fmt::Debug for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            0 => f.write_str("EMPTY"),
            1..=11 => f.write_str("***"),
            n => write!(f, "{}***{}", &self.0[..3], &self.0[n - 3..]),
        }
    }
}
