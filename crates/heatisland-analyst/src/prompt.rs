//! Prompt template loading and rendering via `minijinja`.
//!
//! Templates are read from disk (default: `templates/`) so the analysis
//! persona and task list can be tuned without recompiling. Both templates
//! render against an [`AnalysisDigest`].

use minijinja::Environment;

use crate::digest::AnalysisDigest;
use crate::error::AnalystError;

/// Template names, paired with the file each is loaded from.
const TEMPLATES: [(&str, &str); 2] = [("system", "system.j2"), ("user", "user.j2")];

/// Holds the loaded analysis templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System instruction establishing the analyst persona.
    pub system: String,
    /// User message carrying the data context and the task list.
    pub user: String,
}

impl PromptEngine {
    /// Load `system.j2` and `user.j2` from `templates_dir`.
    pub fn new(templates_dir: &str) -> Result<Self, AnalystError> {
        let mut env = Environment::new();

        for (name, file) in TEMPLATES {
            let source = load_template(templates_dir, file)?;
            env.add_template_owned(name, source)
                .map_err(|e| AnalystError::Template(format!("failed to add {name} template: {e}")))?;
        }

        Ok(Self { env })
    }

    /// Render both messages for one digest.
    pub fn render(&self, digest: &AnalysisDigest) -> Result<RenderedPrompt, AnalystError> {
        Ok(RenderedPrompt {
            system: self.render_one("system", digest)?,
            user: self.render_one("user", digest)?,
        })
    }

    fn render_one(&self, name: &str, digest: &AnalysisDigest) -> Result<String, AnalystError> {
        self.env
            .get_template(name)
            .map_err(|e| AnalystError::Template(format!("missing {name} template: {e}")))?
            .render(digest)
            .map_err(|e| AnalystError::Template(format!("{name} render failed: {e}")))
    }
}

/// Read a template file from disk.
fn load_template(dir: &str, filename: &str) -> Result<String, AnalystError> {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path)
        .map_err(|e| AnalystError::Template(format!("failed to read {path}: {e}")))
}
