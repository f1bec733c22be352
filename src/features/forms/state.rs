use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Field values plus the errors the server attached to the last submission.
///
/// Only declared fields receive field-level errors; messages for any other
/// field name surface as form-level errors instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    fields: BTreeMap<String, Value>,
    server_errors: Vec<String>,
    server_field_errors: BTreeMap<String, Vec<String>>,
    invalid: BTreeSet<String>,
}

impl FormState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `names` as fields, each starting out empty.
    #[must_use]
    pub fn with_fields(names: &[&str]) -> Self {
        let mut form = Self::new();
        for name in names {
            form.fields.insert((*name).to_string(), Value::String(String::new()));
        }
        form
    }

    /// Sets a field value, declaring the field if needed.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Sets a field value the way a user edit does: the field's server
    /// errors and invalid mark are dropped.
    pub fn edit_field(&mut self, name: &str, value: impl Into<Value>) {
        self.set(name, value);
        self.server_field_errors.remove(name);
        self.invalid.remove(name);
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field value as text; empty when missing or not a string.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// All field values as one JSON object.
    #[must_use]
    pub fn data(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect::<Map<String, Value>>(),
        )
    }

    #[must_use]
    pub fn server_errors(&self) -> &[String] {
        &self.server_errors
    }

    #[must_use]
    pub fn field_errors(&self, name: &str) -> &[String] {
        self.server_field_errors
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn server_field_errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.server_field_errors
    }

    #[must_use]
    pub fn is_invalid(&self, name: &str) -> bool {
        self.invalid.contains(name)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.server_errors.is_empty() || !self.server_field_errors.is_empty()
    }

    pub fn clear_server_errors(&mut self) {
        self.server_errors.clear();
        self.server_field_errors.clear();
        self.invalid.clear();
    }

    pub fn add_form_error(&mut self, message: impl Into<String>) {
        self.server_errors.push(message.into());
    }

    /// Appends `message` to a declared field and marks it invalid. Returns
    /// `false` without recording anything when the field is not declared.
    pub fn add_field_error(&mut self, name: &str, message: impl Into<String>) -> bool {
        if !self.fields.contains_key(name) {
            return false;
        }
        self.server_field_errors
            .entry(name.to_string())
            .or_default()
            .push(message.into());
        self.invalid.insert(name.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_collects_declared_fields() {
        let mut form = FormState::with_fields(&["email", "password"]);
        form.set("email", "a@example.com").set("remember", true);

        assert_eq!(
            form.data(),
            json!({"email": "a@example.com", "password": "", "remember": true})
        );
        assert_eq!(form.text("email"), "a@example.com");
        assert_eq!(form.text("remember"), "");
        assert_eq!(form.text("missing"), "");
    }

    #[test]
    fn field_errors_only_attach_to_declared_fields() {
        let mut form = FormState::with_fields(&["email"]);
        assert!(form.add_field_error("email", "Not a valid email"));
        assert!(!form.add_field_error("captcha", "Wrong captcha"));

        assert_eq!(form.field_errors("email"), ["Not a valid email".to_string()]);
        assert!(form.field_errors("captcha").is_empty());
        assert!(form.is_invalid("email"));
        assert!(!form.is_invalid("captcha"));
    }

    #[test]
    fn editing_a_field_clears_only_its_errors() {
        let mut form = FormState::with_fields(&["email", "name"]);
        form.add_field_error("email", "taken");
        form.add_field_error("name", "blank");
        form.add_form_error("Server Error: boom");

        form.edit_field("email", "b@example.com");

        assert!(form.field_errors("email").is_empty());
        assert!(!form.is_invalid("email"));
        assert_eq!(form.field_errors("name"), ["blank".to_string()]);
        assert_eq!(form.server_errors(), ["Server Error: boom".to_string()]);
    }

    #[test]
    fn clear_server_errors_resets_everything() {
        let mut form = FormState::with_fields(&["email"]);
        form.add_field_error("email", "taken");
        form.add_form_error("oops");
        assert!(form.has_errors());

        form.clear_server_errors();

        assert!(!form.has_errors());
        assert!(!form.is_invalid("email"));
        assert_eq!(form.text("email"), "");
    }
}
