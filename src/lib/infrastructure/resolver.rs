//! Default overlay resolver

use serde_json::Value;

use crate::domain::mail::overlay::RawValue;
use crate::domain::mail::resolver::{OverlayResolver, ResolveContext};

/// Resolver evaluating overlay expressions as dot-paths into the primed
/// context.
///
/// An entry with an expression resolves to the referenced context property
/// when present, falling back to the literal value otherwise; an entry
/// without an expression resolves to its literal value. Unset entries
/// resolve to the empty string.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextResolver;

impl OverlayResolver for ContextResolver {
    fn resolve(&self, raw: &RawValue, context: &ResolveContext) -> String {
        match raw.expression.as_deref() {
            Some(expression) => context
                .property(expression)
                .map(stringify)
                .unwrap_or_else(|| raw.value.clone()),
            None => raw.value.clone(),
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::*;

    fn context() -> ResolveContext {
        let mut properties = Map::new();
        properties.insert("username".to_string(), json!("erna"));
        properties.insert("attempts".to_string(), json!(3));
        properties.insert("nickname".to_string(), Value::Null);
        ResolveContext::from_properties(properties)
    }

    #[test]
    fn test_literal_value_resolves_verbatim() {
        let resolved = ContextResolver.resolve(&RawValue::literal("1"), &ResolveContext::empty());
        assert_eq!(resolved, "1");
    }

    #[test]
    fn test_expression_resolves_context_property() {
        let resolved = ContextResolver.resolve(&RawValue::dynamic("username"), &context());
        assert_eq!(resolved, "erna");

        let resolved = ContextResolver.resolve(&RawValue::dynamic("attempts"), &context());
        assert_eq!(resolved, "3");
    }

    #[test]
    fn test_missing_property_falls_back_to_literal() {
        let raw = RawValue {
            value: "fallback".to_string(),
            expression: Some("missing".to_string()),
        };
        assert_eq!(ContextResolver.resolve(&raw, &context()), "fallback");
    }

    #[test]
    fn test_unset_entry_resolves_empty() {
        assert_eq!(
            ContextResolver.resolve(&RawValue::dynamic("missing"), &context()),
            ""
        );
        assert_eq!(
            ContextResolver.resolve(&RawValue::dynamic("nickname"), &context()),
            ""
        );
    }
}
