//! Form state, keyed by field name.
//!
//! Both the browser form and the JSON endpoint are reduced to a [`FormState`]
//! before validation, so the rules in [`crate::rules`] only ever deal with one
//! shape of input.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::validation::digits_only;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: IndexMap<String, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the state from browser form input, applying the same input
    /// normalisation as typing into the form does (phone fields keep digits
    /// only). Repeated keys keep the last value.
    pub fn from_form_pairs(
        pairs: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut state = Self::new();
        for (name, value) in pairs {
            state.input(&name, &value);
        }
        state
    }

    /// Builds the state from a JSON object. Values are taken verbatim: strings
    /// as-is, numbers and booleans in their textual form, `null` as absent.
    ///
    /// Returns the offending key if a value is an array or an object.
    pub fn from_json(object: &Map<String, Value>) -> Result<Self, String> {
        let mut state = Self::new();
        for (name, value) in object {
            match value {
                Value::Null => {}
                Value::String(s) => state.set(name, s.clone()),
                Value::Number(n) => state.set(name, n.to_string()),
                Value::Bool(b) => state.set(name, b.to_string()),
                Value::Array(_) | Value::Object(_) => return Err(name.clone()),
            }
        }
        Ok(state)
    }

    /// Records a value the way the form's input handler does.
    pub fn input(&mut self, name: &str, value: &str) {
        if name.ends_with("_phone") {
            self.set(name, digits_only(value));
        } else {
            self.set(name, value.to_string());
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// The raw value, or the empty string if the field was never set.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// The value as entered, if it is not blank. Surrounding whitespace is
    /// kept; only the blank check trims.
    pub fn value(&self, name: &str) -> Option<String> {
        self.is_filled(name).then(|| self.get(name).to_string())
    }

    pub fn is_filled(&self, name: &str) -> bool {
        !self.get(name).trim().is_empty()
    }

    pub fn is_checked(&self, name: &str) -> bool {
        matches!(self.get(name).trim(), "on" | "true" | "1" | "yes")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::FormState;

    #[test]
    fn phone_input_keeps_digits() {
        let state = FormState::from_form_pairs([
            ("leader_phone".to_string(), "+91 98765-43210".to_string()),
            ("leader_name".to_string(), " Ada ".to_string()),
            ("leader_urn".to_string(), "   ".to_string()),
        ]);
        assert_eq!(state.get("leader_phone"), "919876543210");
        assert_eq!(state.get("leader_name"), " Ada ");
        assert_eq!(state.value("leader_name").as_deref(), Some(" Ada "));
        assert_eq!(state.value("leader_urn"), None);
        assert_eq!(state.value("missing"), None);
    }

    #[test]
    fn json_values_are_taken_verbatim() {
        let payload = json!({
            "team_name": "404_Not_Found",
            "leader_phone": "+91 98765",
            "team_size": 3,
            "agreement": true,
            "leader_linkedin": null,
        });
        let state = FormState::from_json(payload.as_object().unwrap()).unwrap();
        assert_eq!(state.get("leader_phone"), "+91 98765");
        assert_eq!(state.get("team_size"), "3");
        assert!(state.is_checked("agreement"));
        assert!(!state.is_filled("leader_linkedin"));
    }

    #[test]
    fn nested_json_is_rejected() {
        let payload = json!({ "team_name": ["a", "b"] });
        assert_eq!(
            FormState::from_json(payload.as_object().unwrap()),
            Err("team_name".to_string())
        );
    }
}
