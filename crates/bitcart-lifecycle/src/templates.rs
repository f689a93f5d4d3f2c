//! Scaffold templates rendered with Handlebars.
//!
//! Templates are compiled into the binary. Rendering runs in strict mode, so a
//! missing variable is an error rather than an empty string.

use crate::error::{LifecycleError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Backend entry point (`plugin.py`).
pub const BACKEND_PLUGIN: &str = "backend/plugin.py";
/// Frontend package description (`package.json`).
pub const FRONTEND_PACKAGE: &str = "frontend/package.json";
/// Frontend entry point (`index.js`).
pub const FRONTEND_INDEX: &str = "frontend/index.js";
/// Frontend extension hooks (`config/extends.js`).
pub const FRONTEND_EXTENDS: &str = "frontend/config/extends.js";
/// Frontend routes (`config/routes.js`).
pub const FRONTEND_ROUTES: &str = "frontend/config/routes.js";
/// Plugin root `.gitignore`.
pub const GITIGNORE: &str = "gitignore";

/// Plugin root `.editorconfig`, copied verbatim.
pub const EDITORCONFIG: &str = include_str!("../templates/editorconfig");

const TEMPLATES: [(&str, &str); 6] = [
    (BACKEND_PLUGIN, include_str!("../templates/backend/plugin.py.hbs")),
    (FRONTEND_PACKAGE, include_str!("../templates/frontend/package.json.hbs")),
    (FRONTEND_INDEX, include_str!("../templates/frontend/index.js.hbs")),
    (FRONTEND_EXTENDS, include_str!("../templates/frontend/config/extends.js.hbs")),
    (FRONTEND_ROUTES, include_str!("../templates/frontend/config/routes.js.hbs")),
    (GITIGNORE, include_str!("../templates/gitignore.hbs")),
];

/// Variables available to every scaffold template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext<'a> {
    /// Plugin or component name
    pub name: &'a str,
    /// Plugin author
    pub author: &'a str,
}

/// Renders the built-in scaffold templates.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates an engine with every built-in template registered.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Template`] if a built-in template does not parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        // Output is source code and JSON, not HTML.
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| LifecycleError::Template {
                    message: format!("failed to register template {name}: {e}"),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Renders the template registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Template`] if the template is unknown or a
    /// variable is missing.
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| LifecycleError::Template {
                message: format!("failed to render {name}: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: TemplateContext<'static> = TemplateContext {
        name: "demo",
        author: "o'neil",
    };

    #[test]
    fn test_backend_plugin_name() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine.render(BACKEND_PLUGIN, &CONTEXT).unwrap();
        assert!(rendered.contains("name = \"demo\""));
    }

    #[test]
    fn test_package_json_is_valid_json() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine.render(FRONTEND_PACKAGE, &CONTEXT).unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["name"], "@o'neil/demo");
    }

    #[test]
    fn test_strict_mode_rejects_missing_variable() {
        let engine = TemplateEngine::new().unwrap();
        let result = engine.render(BACKEND_PLUGIN, &serde_json::json!({}));
        assert!(matches!(result, Err(LifecycleError::Template { .. })));
    }

    #[test]
    fn test_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.render("missing", &CONTEXT).is_err());
    }
}
