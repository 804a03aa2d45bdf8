use crate::backend::ReasoningBackend;
use crate::error::Result;
use crate::prompts;

/// Pull the key facts out of `question` without answering it.
/// The reply is taken as-is.
pub fn distill(backend: &dyn ReasoningBackend, question: &str) -> Result<String> {
    let distilled = backend.complete(question, prompts::DISTILL_SYSTEM)?;
    tracing::debug!(chars = distilled.len(), "distilled question");
    Ok(distilled)
}

/// Answer `question` guided by the distilled facts and, when non-empty, a
/// template body. The reply is returned verbatim.
pub fn answer(
    backend: &dyn ReasoningBackend,
    question: &str,
    distilled: &str,
    template_content: &str,
) -> Result<String> {
    let system = prompts::answer_system(distilled, template_content);
    let answer = backend.complete(question, &system)?;
    tracing::debug!(
        chars = answer.len(),
        guided = !template_content.is_empty(),
        "answered question"
    );
    Ok(answer)
}
