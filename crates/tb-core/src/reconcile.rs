//! Keep-best reconciliation between a retrieved template and a newly derived one.

use rand::Rng;

use crate::backend::ReasoningBackend;
use crate::delimit::CHOICE;
use crate::error::{Result, StoreError};
use crate::prompts;
use crate::store::TemplateStore;
use crate::template::{RecordId, Template};

/// Order in which two candidates are shown to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation {
    AsGiven,
    Swapped,
}

impl Presentation {
    /// Fair coin, so the backend's positional bias cannot favour either side.
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) {
            Presentation::Swapped
        } else {
            Presentation::AsGiven
        }
    }

    fn arrange<T>(self, a: T, b: T) -> (T, T) {
        match self {
            Presentation::AsGiven => (a, b),
            Presentation::Swapped => (b, a),
        }
    }
}

/// Which of the two presented candidates the backend picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    First,
    Second,
}

/// `<<1>>` alone picks the first candidate, `<<2>>` alone the second.
/// Both or neither is ambiguous and returns `None`.
pub fn parse_pick(reply: &str) -> Option<Position> {
    match (CHOICE.mentions(reply, 1), CHOICE.mentions(reply, 2)) {
        (true, false) => Some(Position::First),
        (false, true) => Some(Position::Second),
        _ => None,
    }
}

/// Ask which of `first`/`second` (in that presentation order) suits `question`.
/// An ambiguous reply falls back to the first-presented candidate.
fn judge(
    backend: &dyn ReasoningBackend,
    question: &str,
    first: &Template,
    second: &Template,
) -> Result<Position> {
    let prompt = prompts::best_of_two(question, first, second);
    let reply = backend.complete(&prompt, prompts::BEST_SYSTEM)?;
    Ok(parse_pick(&reply).unwrap_or_else(|| {
        tracing::warn!(
            reply = %reply.trim(),
            "ambiguous best-of-two reply, keeping first-presented candidate"
        );
        Position::First
    }))
}

/// Whether `a` (`true`) or `b` won, given the presentation order used.
fn a_wins(
    backend: &dyn ReasoningBackend,
    question: &str,
    a: &Template,
    b: &Template,
    order: Presentation,
) -> Result<bool> {
    let (first, second) = order.arrange(a, b);
    let pick = judge(backend, question, first, second)?;
    Ok(matches!(
        (order, pick),
        (Presentation::AsGiven, Position::First) | (Presentation::Swapped, Position::Second)
    ))
}

/// Best of two templates for `question`, presented in random order.
pub fn select_best(
    backend: &dyn ReasoningBackend,
    question: &str,
    a: Template,
    b: Template,
    rng: &mut impl Rng,
) -> Result<Template> {
    select_best_ordered(backend, question, a, b, Presentation::random(rng))
}

/// [`select_best`] with the presentation order fixed by the caller.
pub fn select_best_ordered(
    backend: &dyn ReasoningBackend,
    question: &str,
    a: Template,
    b: Template,
    order: Presentation,
) -> Result<Template> {
    if a_wins(backend, question, &a, &b, order)? {
        Ok(a)
    } else {
        Ok(b)
    }
}

/// Which template ended up in the overwritten record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kept {
    Original,
    Derived,
}

/// What a run wrote to the store. Exactly one record is touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Persisted {
    Created(RecordId),
    Overwritten { id: RecordId, kept: Kept },
}

/// Persist the outcome of a run.
///
/// Without a selected template the derived one becomes a new record. With
/// one, the better of the two overwrites the selected template's record, so
/// the record count never changes on that path.
pub fn reconcile<S: TemplateStore + ?Sized>(
    backend: &dyn ReasoningBackend,
    store: &mut S,
    question: &str,
    selected: Option<&Template>,
    derived: Template,
    rng: &mut impl Rng,
) -> Result<Persisted> {
    let Some(original) = selected else {
        let mut fresh = derived;
        fresh.locator = None;
        let id = store.save(&mut fresh)?;
        tracing::info!(%id, title = %fresh.title, "stored new template");
        return Ok(Persisted::Created(id));
    };

    let Some(id) = original.locator.clone() else {
        return Err(StoreError::InvalidTemplate(format!(
            "selected template '{}' has no record to overwrite",
            original.title
        ))
        .into());
    };

    let order = Presentation::random(rng);
    let (mut winner, kept) = if a_wins(backend, question, original, &derived, order)? {
        (original.clone(), Kept::Original)
    } else {
        (derived, Kept::Derived)
    };

    winner.locator = Some(id.clone());
    store.save(&mut winner)?;
    tracing::info!(%id, ?kept, title = %winner.title, "reconciled template");
    Ok(Persisted::Overwritten { id, kept })
}
