//! prepwise-core: content store, progression engine, and scoring.
//!
//! This crate defines the topic/item data model, the immutable content store,
//! the quiz/drill progression state machine, and the statistics behind the
//! student and teacher dashboards.

pub mod content;
pub mod driver;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod statistics;

pub use content::ContentStore;
pub use driver::{
    run_session, AnswerSource, NoopReporter, ProgressReporter, RunOutcome, ScriptedAnswers,
};
pub use engine::{Advance, ItemState, Outcome, Phase, Reveal, Session, PASS_THRESHOLD_PERCENT};
pub use error::{ContentError, EngineError};
pub use model::{Choice, Item, Topic, TopicKind};
pub use report::{AttemptRecord, SessionReport};
