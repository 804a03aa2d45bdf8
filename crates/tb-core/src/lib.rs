//! Buffer of thoughts: template lifecycle over a text-generation backend.
//!
//! Answers a question by retrieving the most relevant stored thought
//! template, letting it guide one reasoning call, then distilling the
//! solved question into a new template and keeping the better of the two.
//!
//! No I/O of its own. The backend and the template store are ports
//! ([`ReasoningBackend`], [`TemplateStore`]) supplied by the caller.

pub mod answer;
pub mod backend;
pub mod delimit;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod reconcile;
pub mod select;
pub mod store;
pub mod template;

pub use answer::{answer, distill};
pub use backend::{Call, ReasoningBackend, ScriptedBackend};
pub use delimit::{BLOCK, CHOICE, Delimiters, OPTION, Unmatched};
pub use error::{BackendError, BotError, Result, Stage, StoreError};
pub use extract::{extract_template, extract_title};
pub use pipeline::{RunOutcome, ThoughtBuffer};
pub use reconcile::{
    Kept, Persisted, Position, Presentation, parse_pick, reconcile, select_best,
    select_best_ordered,
};
pub use select::{resolve_option, select_template};
pub use store::{MemoryStore, TemplateStore, next_free_id};
pub use template::{RecordId, Template, TemplateRecord, TemplateSet};
