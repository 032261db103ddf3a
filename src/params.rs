use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use crate::config::Credential;

pub(crate) const USER_ID: &str = "UserID";
pub(crate) const METHOD: &str = "method";
pub(crate) const RESULT_FORMAT: &str = "ResultFormat";
pub(crate) const DATASET_NAME: &str = "datasetname";

/// Retrieval operation every request uses unless the caller overrides `method`.
pub const GET_DATA: &str = "GetData";
pub const JSON_FORMAT: &str = "json";

/// Query parameters for a single request.
///
/// Keys are case-preserving and unique; setting an existing key replaces its value.
/// Values are stored in their query-string form, so anything `Display` can be passed in.
///
/// ```
/// use beaapi::Params;
///
/// let p = Params::new().with("Year", 2022).with("Frequency", "A");
/// assert_eq!(p.get("Year"), Some("2022"));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Params::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key`, returning the previous value if there was one.
    pub fn set(&mut self, key: impl Into<String>, value: impl fmt::Display) -> Option<String> {
        self.0.insert(key.into(), value.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Layers every entry of `other` on top of `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: &Params) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in &self.0 {
            if k == USER_ID {
                map.entry(k, &"<redacted>");
            } else {
                map.entry(k, v);
            }
        }
        map.finish()
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut p = Params::new();
        p.extend(iter);
        p
    }
}

impl<K: Into<String>, V: fmt::Display> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parameters sent on every request: credential, operation and response format.
///
/// There is no way to mutate a baseline after construction. [`Baseline::compose`] always
/// builds a fresh map, so back-to-back requests never see each other's parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct Baseline(Params);

impl Baseline {
    pub fn new(credential: &Credential) -> Self {
        Self(
            Params::new()
                .with(USER_ID, credential.expose())
                .with(METHOD, GET_DATA)
                .with(RESULT_FORMAT, JSON_FORMAT),
        )
    }

    /// Baseline entries first, then `overrides`; on a key collision the override wins.
    pub fn compose(&self, overrides: &Params) -> Params {
        let mut out = self.0.clone();
        out.merge(overrides);
        out
    }

    pub fn params(&self) -> &Params {
        &self.0
    }
}

impl fmt::Debug for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Baseline").field(&self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> Baseline {
        Baseline::new(&Credential::new("ABCD-EFGH-IJKL-MNOP-1234"))
    }

    #[test]
    fn compose_keeps_baseline_keys() {
        let out = baseline().compose(&Params::new().with("Year", 2022));
        assert_eq!(out.get(USER_ID), Some("ABCD-EFGH-IJKL-MNOP-1234"));
        assert_eq!(out.get(METHOD), Some("GetData"));
        assert_eq!(out.get(RESULT_FORMAT), Some("json"));
        assert_eq!(out.get("Year"), Some("2022"));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn override_wins_on_collision() {
        let out = baseline().compose(&Params::new().with(RESULT_FORMAT, "xml"));
        assert_eq!(out.get(RESULT_FORMAT), Some("xml"));
    }

    #[test]
    fn compose_does_not_touch_baseline() {
        let base = baseline();
        let before = base.clone();
        let _ = base.compose(&Params::new().with("TableName", "T10101").with(METHOD, "X"));
        let _ = base.compose(&Params::new().with("LineCode", 1));
        assert_eq!(base, before);
        assert!(!base.params().contains_key("TableName"));
    }

    #[test]
    fn set_replaces_and_keeps_case() {
        let mut p = Params::new();
        assert_eq!(p.set("Year", 2020), None);
        assert_eq!(p.set("Year", "ALL").as_deref(), Some("2020"));
        p.set("year", 1999);
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("Year"), Some("ALL"));
    }

    #[test]
    fn debug_hides_user_id() {
        let s = format!("{:?}", baseline());
        assert!(!s.contains("ABCD-EFGH"));
        assert!(s.contains("GetData"));
    }

    #[test]
    fn from_iter_collects_pairs() {
        let p: Params = [("Frequency", "Q"), ("Year", "2021")].into_iter().collect();
        assert_eq!(p.get("Frequency"), Some("Q"));
        assert_eq!(p.iter().count(), 2);
    }
}
