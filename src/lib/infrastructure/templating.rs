//! MiniJinja-backed template rendering

use std::path::PathBuf;

use minijinja::Environment;

use crate::domain::mail::errors::RenderError;
use crate::domain::mail::templating::TemplateRenderer;
use crate::domain::mail::variables::VariableBag;

/// Renders `Email/<TemplateName>.html` files below a template root with
/// minijinja, inlining CSS into the resulting markup.
///
/// The first letter of the template name is upper-cased when deriving the
/// file name, so template `welcome` renders `Email/Welcome.html`.
#[derive(Clone, Debug)]
pub struct MiniJinjaRenderer {
    root: PathBuf,
}

impl MiniJinjaRenderer {
    /// Create a renderer reading templates below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn template_path(&self, template: &str) -> PathBuf {
        self.root
            .join("Email")
            .join(format!("{}.html", ucfirst(template)))
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, variables: &VariableBag) -> Result<String, RenderError> {
        let path = self.template_path(template);
        let source = std::fs::read_to_string(&path)
            .map_err(|_| RenderError::UnknownTemplate(template.to_string()))?;

        let mut env = Environment::new();
        env.add_template(template, &source)
            .map_err(|e| RenderError::RenderFailure(anyhow::Error::new(e)))?;
        let html = env
            .get_template(template)
            .and_then(|tmpl| tmpl.render(variables))
            .map_err(|e| RenderError::RenderFailure(anyhow::Error::new(e)))?;

        css_inline::inline(&html).map_err(|e| RenderError::RenderFailure(anyhow::Error::new(e)))
    }
}

fn ucfirst(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
