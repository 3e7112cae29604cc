//! Template variable bag

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the current user's property bag may be supplied.
pub const USER_VARIABLE: &str = "user";

/// Variables handed to the templating collaborator and to lifecycle
/// subscribers.
///
/// The composer may augment the bag before rendering, e.g. with the list of
/// embedded-image handles; that augmentation is visible to the caller after
/// `send` returns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableBag(Map<String, Value>);

impl VariableBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value under the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the bag holds no variables
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of variables in the bag
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The property bag of the current user, when the `user` entry is an
    /// object. Used to prime overlay resolution.
    pub fn user_properties(&self) -> Option<&Map<String, Value>> {
        self.0.get(USER_VARIABLE).and_then(Value::as_object)
    }
}

impl From<Map<String, Value>> for VariableBag {
    fn from(variables: Map<String, Value>) -> Self {
        Self(variables)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut bag = VariableBag::new();
        bag.set("username", "Erna").set("attempts", 3);

        assert_eq!(bag.get("username"), Some(&json!("Erna")));
        assert_eq!(bag.get("attempts"), Some(&json!(3)));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_user_properties_requires_an_object() {
        let mut bag = VariableBag::new();
        assert!(bag.user_properties().is_none());

        bag.set(USER_VARIABLE, "not an object");
        assert!(bag.user_properties().is_none());

        bag.set(USER_VARIABLE, json!({ "username": "erna" }));
        let properties = bag.user_properties().unwrap();
        assert_eq!(properties.get("username"), Some(&json!("erna")));
    }
}
