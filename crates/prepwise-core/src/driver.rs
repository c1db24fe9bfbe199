//! Runs a session end to end from a source of answers.
//!
//! The CLI plugs in a stdin prompter; tests and `--answers` use
//! `ScriptedAnswers`.

use chrono::Utc;

use crate::engine::{Advance, Outcome, Reveal, Session};
use crate::error::EngineError;
use crate::model::Item;
use crate::report::SessionReport;

/// Supplies the user's choice for each item.
pub trait AnswerSource {
    /// Return the chosen (0-based) index for `item`, or `None` to quit.
    fn next_choice(&mut self, item: &Item, index: usize) -> Option<usize>;
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_item_start(&self, item: &Item, index: usize, total: usize);
    fn on_reveal(&self, item: &Item, reveal: &Reveal);
    fn on_finish(&self, outcome: &Outcome);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_item_start(&self, _: &Item, _: usize, _: usize) {}
    fn on_reveal(&self, _: &Item, _: &Reveal) {}
    fn on_finish(&self, _: &Outcome) {}
}

/// Answers taken from a fixed list, in order.
#[derive(Debug, Clone)]
pub struct ScriptedAnswers {
    choices: std::vec::IntoIter<usize>,
}

impl ScriptedAnswers {
    pub fn new(choices: Vec<usize>) -> Self {
        Self {
            choices: choices.into_iter(),
        }
    }

    /// Parse a comma-separated list of 1-based choice numbers, e.g. `"2,1,3"`.
    pub fn parse_one_based(list: &str) -> Result<Self, String> {
        let choices = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(n - 1),
                _ => Err(format!("invalid answer: '{s}' (expected a number from 1)")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(choices))
    }

    /// Answers not yet handed out.
    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

impl AnswerSource for ScriptedAnswers {
    fn next_choice(&mut self, _item: &Item, _index: usize) -> Option<usize> {
        self.choices.next()
    }
}

/// How a driven session ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(SessionReport),
    /// The answer source ran dry after `answered` items.
    Abandoned { answered: usize },
}

/// Drive `session` from its current position to the end.
///
/// Returns the engine error unchanged if the source picks an invalid choice.
pub fn run_session(
    session: &mut Session,
    answers: &mut dyn AnswerSource,
    reporter: &dyn ProgressReporter,
) -> Result<RunOutcome, EngineError> {
    let started_at = Utc::now();
    let total = session.len();
    let mut answered = 0usize;

    while let Some(index) = session.current_index() {
        let topic = std::sync::Arc::clone(session.topic());
        let item = &topic.items()[index];

        if !session.is_revealed() {
            reporter.on_item_start(item, index, total);
            let Some(choice) = answers.next_choice(item, index) else {
                tracing::info!(topic = topic.key(), answered, "session abandoned");
                return Ok(RunOutcome::Abandoned { answered });
            };
            session.select_choice(choice)?;
            let reveal = session.reveal()?;
            reporter.on_reveal(item, &reveal);
            answered += 1;
        }

        if let Advance::Finished(outcome) = session.advance()? {
            reporter.on_finish(&outcome);
        }
    }

    let report = SessionReport::from_session(session, started_at, Utc::now()).ok_or(
        EngineError::InvalidState {
            operation: "build a report",
            state: "in progress",
        },
    )?;
    Ok(RunOutcome::Completed(report))
}
