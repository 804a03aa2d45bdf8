use crate::backend::ReasoningBackend;
use crate::delimit::OPTION;
use crate::error::Result;
use crate::prompts;
use crate::template::Template;

/// Ask the backend which stored template, if any, fits `question`.
///
/// Options are numbered `[1]..[N]` in set order with `[N+1]` meaning "none".
/// An empty set returns `None` without a backend call. A reply naming the
/// none-slot, an out-of-range number, or a first bracketed token that is
/// not a number also yields `None`.
pub fn select_template<'t>(
    backend: &dyn ReasoningBackend,
    question: &str,
    templates: &'t [Template],
) -> Result<Option<&'t Template>> {
    if templates.is_empty() {
        tracing::debug!("no stored templates, skipping selection");
        return Ok(None);
    }

    let prompt = prompts::select(question, templates);
    let reply = backend.complete(&prompt, prompts::SELECT_SYSTEM)?;
    let choice = resolve_option(&reply, templates.len());

    match choice {
        Some(idx) => tracing::debug!(
            option = idx + 1,
            title = %templates[idx].title,
            "selected template"
        ),
        None => tracing::debug!(reply = %reply.trim(), "no template selected"),
    }
    Ok(choice.map(|idx| &templates[idx]))
}

/// Map a selection reply to a zero-based template index.
pub fn resolve_option(reply: &str, n: usize) -> Option<usize> {
    let k = OPTION.first_integer(reply)?;
    let idx = usize::try_from(k).ok()?.checked_sub(1)?;
    (idx < n).then_some(idx)
}
