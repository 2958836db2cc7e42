//! The advisor persona and its instruction template.
//!
//! The persona text is a minijinja template with the grounding context
//! interpolated; the composer tolerates an empty context, so the template
//! must read naturally when `context` is blank.

use mentora_core::{MentoraError, Result};
use minijinja::{context, Environment};

const DEFAULT_TEMPLATE: &str = r#"You are Mentora, a friendly, approachable AI advisor who helps students with everything about studying abroad, especially the UK and Europe.

**Behavior:**
- If the student greets you, thanks you, or asks how you are, respond naturally, warmly and conversationally, the way a supportive friend would.
- If the student expresses feelings (happy, sad, worried, excited), respond supportively and use casual, relatable, uplifting language.
- For all other questions, base your answer entirely on the information given in Context below. If the information is not in the Context, say so politely.
- If the answer is not in the Context, check the conversation so far before giving up.

**Important:**
- Never invent your own name or personal story. Always use the name, details, and identity from Context.
- For questions outside studying abroad, or about illegal or inappropriate topics, politely explain your area of expertise but stay friendly and open.
- General chit-chat and rapport-building messages are fine to answer as a real assistant would.

**Context for this conversation:**
{{ context }}

Respond in a friendly and engaging tone, as Mentora!"#;

/// The system persona sent with every answer-generation prompt.
#[derive(Debug, Clone)]
pub struct AdvisorPersona {
    template: String,
}

impl AdvisorPersona {
    /// The built-in study-abroad advisor persona.
    pub fn new() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Uses a caller-supplied template instead of the built-in one.
    ///
    /// The template may reference `{{ context }}` for the grounding passage.
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Renders the persona instructions with the grounding context.
    pub fn instructions(&self, grounding_context: &str) -> Result<String> {
        let mut env = Environment::new();
        env.add_template("persona", &self.template)
            .map_err(|e| MentoraError::config(format!("invalid persona template: {e}")))?;
        let template = env
            .get_template("persona")
            .map_err(|e| MentoraError::internal(format!("persona template lookup failed: {e}")))?;
        template
            .render(context! { context => grounding_context })
            .map_err(|e| MentoraError::internal(format!("persona template render failed: {e}")))
    }
}

impl Default for AdvisorPersona {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounding_context_is_interpolated() {
        let persona = AdvisorPersona::new();
        let rendered = persona
            .instructions("Tuition fees in the UK range from £10,000 to £38,000.")
            .unwrap();
        assert!(rendered.contains("Tuition fees in the UK"));
        assert!(rendered.contains("Mentora"));
    }

    #[test]
    fn empty_context_still_renders() {
        let rendered = AdvisorPersona::new().instructions("").unwrap();
        assert!(rendered.contains("**Context for this conversation:**"));
    }

    #[test]
    fn custom_templates_are_honored() {
        let persona = AdvisorPersona::with_template("Answer using: {{ context }}");
        let rendered = persona.instructions("facts").unwrap();
        assert_eq!(rendered, "Answer using: facts");
    }

    #[test]
    fn broken_templates_surface_a_config_error() {
        let persona = AdvisorPersona::with_template("{% bad");
        assert!(persona.instructions("x").is_err());
    }
}
