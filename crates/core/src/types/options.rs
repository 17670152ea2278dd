//! Selected product options.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The options a shopper picked for a product (e.g. ring size, metal).
///
/// Selected options are half of a cart line's identity: the same product with
/// different options forms distinct cart lines. The map is ordered by option
/// name, so equality and hashing do not depend on the order options were
/// chosen in, and it serializes as a plain JSON object.
///
/// ## Examples
///
/// ```
/// use almas_dimas_core::SelectedOptions;
///
/// let mut gold = SelectedOptions::new();
/// gold.insert("Metal", "Gold");
/// gold.insert("Size", "52");
///
/// let same: SelectedOptions =
///     [("Size", "52"), ("Metal", "Gold")].into_iter().collect();
/// assert_eq!(gold, same);
/// assert_eq!(gold.to_string(), "Metal: Gold, Size: 52");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedOptions(BTreeMap<String, String>);

impl SelectedOptions {
    /// Create an empty option set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns `true` if no options were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Look up the chosen value for an option name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Set an option, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for SelectedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SelectedOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
