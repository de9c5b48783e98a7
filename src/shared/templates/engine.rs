//! Page template engine using Jinja2 syntax.
//!
//! Templates are compiled into the binary from `templates/pages/` so the server
//! does not depend on its working directory at runtime.

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::core::error::AppError;

/// Templates bundled with the binary, by name
const PAGE_TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../../../templates/pages/base.html")),
    ("login.html", include_str!("../../../templates/pages/login.html")),
    ("register.html", include_str!("../../../templates/pages/register.html")),
    (
        "user_dashboard.html",
        include_str!("../../../templates/pages/user_dashboard.html"),
    ),
    (
        "mayor_dashboard.html",
        include_str!("../../../templates/pages/mayor_dashboard.html"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to load template '{0}': {1}")]
    LoadError(String, String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Renders HTML pages. `.html` templates are auto-escaped.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Environment::new();

        for (name, source) in PAGE_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| TemplateError::LoadError(name.to_string(), e.to_string()))?;
            tracing::debug!("Loaded template: {}", name);
        }

        Ok(Self { env })
    }

    /// Render a template with the given context.
    ///
    /// # Example
    /// ```ignore
    /// let html = renderer.render("login.html", context! { flash => None::<()> })?;
    /// ```
    pub fn render<S: Serialize>(
        &self,
        template_name: &str,
        ctx: S,
    ) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_pages_load() {
        assert!(PageRenderer::new().is_ok());
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let renderer = PageRenderer::new().unwrap();
        let result = renderer.render("definitely_not_a_page.html", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_flash_is_rendered_and_escaped() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render(
                "login.html",
                context! { flash => context! { message => "<b>hi</b>", category => "danger" } },
            )
            .unwrap();

        assert!(html.contains("&lt;b&gt;hi"));
        assert!(!html.contains("<b>hi"));
        assert!(html.contains("flash danger"));
    }
}
