//! Infrastructure implementation of the `TemplateRenderer` port.
//!
//! Templates are compiled into the binary from `cli/templates/` and
//! rendered with minijinja.

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};
use minijinja::Environment;

use crate::application::ports::TemplateRenderer;

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Every embedded template, registered under its file name.
pub struct EmbeddedTemplates {
    env: Environment<'static>,
}

impl EmbeddedTemplates {
    /// # Errors
    ///
    /// Returns an error if an embedded template is not valid UTF-8 or does
    /// not parse.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        for file in TEMPLATES_DIR.files() {
            let name = file
                .path()
                .to_str()
                .with_context(|| format!("template path {} is not UTF-8", file.path().display()))?;
            let source = file
                .contents_utf8()
                .with_context(|| format!("template {name} is not UTF-8"))?;
            env.add_template(name, source)
                .with_context(|| format!("failed to register template '{name}'"))?;
        }
        Ok(Self { env })
    }

    /// Names of all embedded templates.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.env.templates().map(|(name, _)| name).collect();
        names.sort_unstable();
        names
    }
}

impl TemplateRenderer for EmbeddedTemplates {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .with_context(|| format!("failed to load template '{name}'"))?;
        template
            .render(context)
            .with_context(|| format!("failed to render template '{name}'"))
    }
}
