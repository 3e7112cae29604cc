//! Template rendering seam

#[cfg(test)]
use mockall::mock;

use super::errors::RenderError;
use super::variables::VariableBag;

/// Renders an HTML body from a template name and a variable bag.
///
/// Consumed by transport implementations when preparing the wire message;
/// the composer itself only binds the template name.
pub trait TemplateRenderer: Clone + Send + Sync + 'static {
    /// Render `template` with `variables`.
    ///
    /// # Arguments
    /// * `template` - Name of the template to render.
    /// * `variables` - The variables exposed to the template.
    ///
    /// # Returns
    /// The rendered HTML, or a [`RenderError`] when the template is missing
    /// or fails to render.
    fn render(&self, template: &str, variables: &VariableBag) -> Result<String, RenderError>;
}

#[cfg(test)]
mock! {
    pub TemplateRenderer {}

    impl Clone for TemplateRenderer {
        fn clone(&self) -> Self;
    }

    impl TemplateRenderer for TemplateRenderer {
        fn render(&self, template: &str, variables: &VariableBag) -> Result<String, RenderError>;
    }
}
