//! Overlay resolution seam

use serde_json::{Map, Value};

#[cfg(test)]
use mockall::mock;

use super::overlay::RawValue;

/// Property bag exposed to overlay expressions for one `send` invocation.
///
/// The composer primes the context from the `user` variable before any
/// post-gate resolution and passes it explicitly into every resolver call;
/// there is no ambient state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolveContext(Map<String, Value>);

impl ResolveContext {
    /// Context with no properties
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context primed with a property bag
    pub fn from_properties(properties: Map<String, Value>) -> Self {
        Self(properties)
    }

    /// Whether the context holds no properties
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a property by dot-separated path, descending into nested
    /// objects.
    pub fn property(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }
}

/// Turns one raw overlay entry into a concrete string in the current
/// context.
///
/// Resolution is trusted not to fail: an unset or unresolvable entry yields
/// the empty string, which callers treat as "override absent".
pub trait OverlayResolver: Clone + Send + Sync + 'static {
    /// Resolve `raw` against `context`.
    ///
    /// # Arguments
    /// * `raw` - The overlay entry to resolve.
    /// * `context` - The property bag primed for this invocation.
    ///
    /// # Returns
    /// The resolved string; empty when the entry is unset.
    fn resolve(&self, raw: &RawValue, context: &ResolveContext) -> String;
}

#[cfg(test)]
mock! {
    pub OverlayResolver {}

    impl Clone for OverlayResolver {
        fn clone(&self) -> Self;
    }

    impl OverlayResolver for OverlayResolver {
        fn resolve(&self, raw: &RawValue, context: &ResolveContext) -> String;
    }
}
