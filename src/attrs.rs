//! Decoder for the compound attribute field.
//!
//! The free-text column holds a secondary-delimited list of `key=value`
//! pairs. Pairs split on the first `=` only; a pair without `=` is a
//! flag-style key with an empty value. Values are trimmed, HTML-entity
//! decoded, and lose one layer of surrounding quotes.

use std::{borrow::Cow, collections::HashMap};

use quick_xml::escape::unescape;

use crate::rows::strip_matching_quotes;

/// Sub-key to sub-value map preserving first-appearance order. A duplicate
/// sub-key overwrites the value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrMap {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl AttrMap {
    pub fn insert(&mut self, key: String, value: String) {
        if self.values.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &str)> {
        self.order
            .iter()
            .map(|key| (key, self.values[key].as_str()))
    }
}

/// Decodes one record's free-text field value into an [`AttrMap`]. Empty
/// input yields an empty map.
pub fn parse_attributes(raw: &str, separator: &str) -> AttrMap {
    let mut attributes = AttrMap::default();
    if raw.is_empty() {
        return attributes;
    }
    for pair in raw.split(separator) {
        match pair.split_once('=') {
            Some((key, value)) => {
                let value = unescape_entities(value.trim());
                let value = strip_matching_quotes(&value).to_string();
                attributes.insert(key.trim().to_string(), value);
            }
            None => attributes.insert(pair.trim().to_string(), String::new()),
        }
    }
    attributes
}

/// Entity decoding never fails the parse: unrecognized or malformed
/// entities leave the value as-is.
fn unescape_entities(value: &str) -> String {
    unescape(value)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| value.to_string())
}
