use crate::backend::ReasoningBackend;
use crate::delimit::BLOCK;
use crate::error::{BotError, Result, Stage};
use crate::prompts;

/// Generalise a solved question into a reusable template body.
pub fn extract_template(
    backend: &dyn ReasoningBackend,
    question: &str,
    answer: &str,
) -> Result<String> {
    let prompt = prompts::extract_template(question, answer);
    let reply = backend.complete(&prompt, prompts::EXTRACT_SYSTEM)?;
    let content = block(Stage::Template, &reply)?;
    tracing::debug!(chars = content.len(), "extracted template");
    Ok(content)
}

/// Generate a short title for a template body.
pub fn extract_title(backend: &dyn ReasoningBackend, content: &str) -> Result<String> {
    let prompt = prompts::title(content);
    let reply = backend.complete(&prompt, prompts::TITLE_SYSTEM)?;
    let title = block(Stage::Title, &reply)?;
    tracing::debug!(%title, "generated title");
    Ok(title)
}

/// `[begin]...[end]` payload of `reply`. Missing markers or an empty payload fail.
fn block(stage: Stage, reply: &str) -> Result<String> {
    match BLOCK.extract(reply) {
        Ok(text) if !text.is_empty() => Ok(text.to_string()),
        Ok(_) => Err(failed(stage, reply, "empty payload")),
        Err(e) => Err(failed(stage, reply, &e.to_string())),
    }
}

fn failed(stage: Stage, reply: &str, why: &str) -> BotError {
    tracing::debug!(%stage, why, "marker extraction failed");
    BotError::ExtractionFailed {
        stage,
        response: reply.to_string(),
    }
}
