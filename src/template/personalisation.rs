//! Personalisation values keyed by placeholder name

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single personalisation value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonalisationValue {
    /// Explicit JSON `null`, treated as if the key were absent
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<PersonalisationValue>),
}

impl PersonalisationValue {
    /// Whether this value shows the text of a conditional placeholder.
    ///
    /// Only an explicit boolean `true` does.
    pub fn shows_conditional(&self) -> bool {
        matches!(self, PersonalisationValue::Bool(true))
    }

    /// Scalar text form; `None` for null and for lists
    pub fn as_text(&self) -> Option<String> {
        match self {
            PersonalisationValue::Null | PersonalisationValue::List(_) => None,
            PersonalisationValue::Bool(b) => Some(b.to_string()),
            PersonalisationValue::Number(n) => Some(n.to_string()),
            PersonalisationValue::Text(s) => Some(s.clone()),
        }
    }

    /// Non-blank list items as text; `None` unless this is a list
    pub fn list_items(&self) -> Option<Vec<String>> {
        match self {
            PersonalisationValue::List(items) => Some(
                items
                    .iter()
                    .filter_map(PersonalisationValue::as_text)
                    .filter(|item| !item.trim().is_empty())
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl From<&str> for PersonalisationValue {
    fn from(value: &str) -> Self {
        PersonalisationValue::Text(value.to_string())
    }
}

impl From<String> for PersonalisationValue {
    fn from(value: String) -> Self {
        PersonalisationValue::Text(value)
    }
}

impl From<bool> for PersonalisationValue {
    fn from(value: bool) -> Self {
        PersonalisationValue::Bool(value)
    }
}

impl From<i64> for PersonalisationValue {
    fn from(value: i64) -> Self {
        PersonalisationValue::Number(value.into())
    }
}

impl<T: Into<PersonalisationValue>> From<Vec<T>> for PersonalisationValue {
    fn from(values: Vec<T>) -> Self {
        PersonalisationValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Mapping from placeholder name to value.
///
/// Names are case-sensitive and trimmed on both insert and lookup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, PersonalisationValue>")]
pub struct Personalisation {
    values: HashMap<String, PersonalisationValue>,
}

impl Personalisation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<PersonalisationValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value, returning any previous value for the name
    pub fn insert(
        &mut self,
        name: &str,
        value: impl Into<PersonalisationValue>,
    ) -> Option<PersonalisationValue> {
        self.values.insert(name.trim().to_string(), value.into())
    }

    /// Look up a value; explicit nulls read as absent
    pub fn get(&self, name: &str) -> Option<&PersonalisationValue> {
        self.values
            .get(name.trim())
            .filter(|value| !matches!(value, PersonalisationValue::Null))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, PersonalisationValue>> for Personalisation {
    fn from(values: HashMap<String, PersonalisationValue>) -> Self {
        values.into_iter().collect()
    }
}

impl<K: AsRef<str>, V: Into<PersonalisationValue>> FromIterator<(K, V)> for Personalisation {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut personalisation = Personalisation::new();
        for (name, value) in iter {
            personalisation.insert(name.as_ref(), value);
        }
        personalisation
    }
}
