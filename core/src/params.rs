//! Query parameters with deterministic encoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Query parameters: each key maps to one or more values.
///
/// Keys are kept sorted so `encode` always produces the same string for the
/// same set of parameters. Values of a key keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Vec<String>>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), vec![value.into()]);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// `application/x-www-form-urlencoded` form, sorted by key.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.0 {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl From<BTreeMap<String, Vec<String>>> for Params {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.add(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_encode_to_empty_string() {
        assert_eq!(Params::new().encode(), "");
        assert!(Params::new().is_empty());
    }

    #[test]
    fn keys_are_sorted() {
        let params = Params::new().with("zeta", "1").with("alpha", "2");
        assert_eq!(params.encode(), "alpha=2&zeta=1");
    }

    #[test]
    fn repeated_keys_keep_value_order() {
        let params: Params = [("tag", "b"), ("tag", "a"), ("page", "2")].into_iter().collect();
        assert_eq!(params.encode(), "page=2&tag=b&tag=a");
        assert_eq!(params.get("tag"), Some("b"));
        assert_eq!(params.get_all("tag"), ["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn set_replaces_values() {
        let mut params = Params::new().with("tag", "a").with("tag", "b");
        params.set("tag", "c");
        assert_eq!(params.encode(), "tag=c");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let params = Params::new().with("q", "fish & chips/7");
        assert_eq!(params.encode(), "q=fish+%26+chips%2F7");
    }

    #[test]
    fn deserializes_from_json_object() {
        let params: Params = serde_json::from_str(r#"{"b":["2"],"a":["1","3"]}"#).unwrap();
        assert_eq!(params.encode(), "a=1&a=3&b=2");
    }
}
