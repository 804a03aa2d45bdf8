use rand::Rng;

use crate::answer::{answer, distill};
use crate::backend::ReasoningBackend;
use crate::error::Result;
use crate::extract::{extract_template, extract_title};
use crate::reconcile::{Persisted, reconcile};
use crate::select::select_template;
use crate::store::TemplateStore;
use crate::template::{RecordId, Template};

/// Result of answering one question through the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub answer: String,
    /// Record of the template that guided the answer, if one was selected.
    pub selected: Option<RecordId>,
    pub persisted: Persisted,
}

/// Buffer of thoughts over one reasoning backend.
///
/// A run is: select → distill → answer → extract template → title →
/// reconcile. Every backend call happens before the single store write, so a
/// failed run leaves the store untouched.
pub struct ThoughtBuffer<B> {
    backend: B,
}

impl<B: ReasoningBackend> ThoughtBuffer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn run<S: TemplateStore + ?Sized>(
        &self,
        question: &str,
        store: &mut S,
        rng: &mut impl Rng,
    ) -> Result<RunOutcome> {
        let backend: &dyn ReasoningBackend = &self.backend;

        let templates = store.load_all()?;
        tracing::debug!(count = templates.len(), "loaded templates");

        let selected = select_template(backend, question, &templates)?;
        let distilled = distill(backend, question)?;
        let guide = selected.map(|t| t.content.as_str()).unwrap_or_default();
        let answer = answer(backend, question, &distilled, guide)?;

        let content = extract_template(backend, question, &answer)?;
        let title = extract_title(backend, &content)?;
        let derived = Template::new(&title, &content);

        let persisted = reconcile(backend, store, question, selected, derived, rng)?;

        Ok(RunOutcome {
            answer,
            selected: selected.and_then(|t| t.locator.clone()),
            persisted,
        })
    }
}
