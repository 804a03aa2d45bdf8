//! Prompt texts for every backend round trip.
//!
//! Builders only assemble strings; parsing of the replies lives next to the
//! stage that issues them.

use crate::delimit::{BLOCK, CHOICE, OPTION};
use crate::template::Template;

pub const SELECT_SYSTEM: &str = "You are good at drawing on reference articles to solve problems. \
When asked to pick one article out of several you always choose the most useful one. \
Articles are often general rather than specific to the question; when nothing fits well, \
a possibly useful article is still better than none.";

pub const DISTILL_SYSTEM: &str = "Extract and list the key information, boundary conditions and \
constraints in the user's question. Important: do not answer the question and do not analyse it. \
Output only the list.";

pub const EXTRACT_SYSTEM: &str = "You are adept at abstracting general thinking methods from \
specific problems, forming thought templates that make similar problems easier to solve later.";

pub const TITLE_SYSTEM: &str = "You are good at summarising and organising written material so \
that it is easy to find and reuse later.";

pub const BEST_SYSTEM: &str = "You are good at choosing the thought template best suited to a question.";

/// Label shown for the "none of these" slot in template selection.
pub const NO_OPTION: &str = "No suitable option";

pub fn select(question: &str, templates: &[Template]) -> String {
    let mut items = String::new();
    for (i, template) in templates.iter().enumerate() {
        items.push_str(&format!("{} {}\n", OPTION.wrap(i + 1), template.title));
    }
    items.push_str(&format!("{} {NO_OPTION}\n", OPTION.wrap(templates.len() + 1)));

    format!(
        "The following question needs an answer:\n\
         {question}\n\
         End of question.\n\n\
         These articles are available for reference:\n\
         {items}\n\
         You must choose exactly one option. Options start with {open} and end with {close}, \
         for example: {example}. Reply with the option only. Do not analyse or answer the question.",
        open = OPTION.open,
        close = OPTION.close,
        example = OPTION.wrap(1),
    )
}

pub fn answer_system(distilled: &str, template_content: &str) -> String {
    if template_content.is_empty() {
        return format!("Answer the question using the following information:\n\n{distilled}");
    }
    format!(
        "Answer the question using the following distilled information and thought template.\n\n\
         distilled information begin\n\
         {distilled}\n\
         distilled information end\n\n\
         thought template begin\n\
         {template_content}\n\
         thought template end"
    )
}

pub fn extract_template(question: &str, answer: &str) -> String {
    format!(
        "Below is a concrete question and one possible answer. Extract a thought template: a \
         general method for solving questions of the same kind. Your thought template must start \
         with {open} and end with {close}.\n\n\
         question begin\n\
         {question}\n\
         question end\n\n\
         answer begin\n\
         {answer}\n\
         answer end",
        open = BLOCK.open,
        close = BLOCK.close,
    )
}

pub fn title(content: &str) -> String {
    format!(
        "The following article has no title. Give it an accurate title so it can be found by \
         title later.\n\n\
         article begin\n\
         {content}\n\
         article end\n\n\
         Your title must start with {open} and end with {close}. Give the title only.",
        open = BLOCK.open,
        close = BLOCK.close,
    )
}

pub fn best_of_two(question: &str, first: &Template, second: &Template) -> String {
    let one = CHOICE.wrap(1);
    let two = CHOICE.wrap(2);
    format!(
        "For the following question:\n\n\
         question begin\n\
         {question}\n\
         question end\n\n\
         choose the thought template ({one} or {two}) best suited to solving it:\n\n\
         {one}\n\n{}\n\n{}\n\n\
         {two}\n\n{}\n\n{}\n\n\
         You must choose one of the two. Options start with {open} and end with {close}, \
         for example: {one}. Reply with the option only. Do not analyse or answer the question.",
        first.title,
        first.content,
        second.title,
        second.content,
        open = CHOICE.open,
        close = CHOICE.close,
    )
}
