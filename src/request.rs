//! Request parameter preparation.

use std::collections::BTreeMap;

/// Name of the parameter carrying the API token on every request
pub const API_TOKEN_PARAM: &str = "apiToken";

/// Options for a single request, kept sorted by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options(BTreeMap<String, String>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Options {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut options = Options::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

/// Merge `defaults` with caller `options` and force the API token.
///
/// Caller options override defaults; the token overrides both. The result
/// is sorted by key.
pub fn prepare_options(defaults: &Options, options: &Options, api_token: &str) -> Vec<(String, String)> {
    let mut merged = defaults.0.clone();
    merged.extend(options.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged.insert(API_TOKEN_PARAM.to_string(), api_token.to_string());
    merged.into_iter().collect()
}
