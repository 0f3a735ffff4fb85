//! `Params`: captured parameters and reversal dictionaries.

use std::collections::{BTreeMap, HashMap};

/// A flat mapping from parameter name to value.
///
/// Returned by [`Template::matches`](crate::Template::matches) and consumed by
/// [`Template::reverse`](crate::Template::reverse).
///
/// A value is `None` when an optional query capture was absent from the URL.
/// On reversal, `None` and a missing entry both mean "absent".
///
/// Entries iterate in name order.
///
/// # Example
///
/// ```
/// use teki::Params;
///
/// let params = Params::new().with("id", "123").with_absent("page");
/// assert_eq!(params.get("id"), Some("123"));
/// assert_eq!(params.get("page"), None);
/// assert!(params.contains_key("page"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Params {
    values: BTreeMap<String, Option<String>>,
}

impl Params {
    /// Create an empty set of parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a present value (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), Some(value.into()));
        self
    }

    /// Add an explicitly absent value (builder pattern).
    #[must_use]
    pub fn with_absent(mut self, name: impl Into<String>) -> Self {
        self.values.insert(name.into(), None);
        self
    }

    /// Insert a value, returning the previous entry if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        self.values.insert(name.into(), value)
    }

    /// Get a present value by name.
    ///
    /// Returns `None` both for missing entries and for absent values.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Option::as_deref)
    }

    /// Is there an entry for `name`, present or absent?
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Option<String>> {
        self.values
    }
}

impl From<BTreeMap<String, Option<String>>> for Params {
    fn from(values: BTreeMap<String, Option<String>>) -> Self {
        Self { values }
    }
}

impl From<HashMap<String, String>> for Params {
    fn from(values: HashMap<String, String>) -> Self {
        values.into_iter().map(|(k, v)| (k, Some(v))).collect()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect()
    }
}

impl FromIterator<(String, Option<String>)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, Option<String>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
