//! Progression engine shared by quizzes and drills.
//!
//! A session walks a topic's items in order. Each item moves
//! `Unanswered -> Selected -> Revealed`; the session moves
//! `InProgress -> Finished`, and `restart` is the only way back. There is no
//! skipping, no going back, and no partial credit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{Item, Topic};

/// Percentage at or above which a session counts as passed / certified.
pub const PASS_THRESHOLD_PERCENT: u8 = 80;

/// Per-item state while the session is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemState {
    Unanswered,
    Selected { choice: usize },
    Revealed { choice: usize, correct: bool },
}

impl ItemState {
    fn name(&self) -> &'static str {
        match self {
            ItemState::Unanswered => "unanswered",
            ItemState::Selected { .. } => "selected",
            ItemState::Revealed { .. } => "revealed",
        }
    }
}

/// Session-level state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    InProgress { index: usize, item: ItemState },
    Finished { percentage: u8 },
}

/// What the presentation layer shows after `reveal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub item_index: usize,
    pub choice: usize,
    pub correct: bool,
    pub correct_choice: usize,
    /// Per-choice feedback (drills only).
    pub feedback: Option<String>,
    pub explanation: String,
}

/// Final tally of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
    pub passed: bool,
}

/// Result of `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the item at `index`.
    Next { index: usize },
    /// That was the last item.
    Finished(Outcome),
}

/// Position within the session, for progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the current item.
    pub position: usize,
    pub total: usize,
    /// `round(100 * position / total)`.
    pub percent: u8,
}

/// One row of the post-session answer review.
#[derive(Debug, Clone, Copy)]
pub struct ReviewEntry<'a> {
    pub item: &'a Item,
    pub selected: Option<usize>,
    pub correct: bool,
}

/// Round-half-up integer percentage of `part / whole`.
///
/// Matches JavaScript's `Math.round(part / whole * 100)` for non-negative
/// inputs. Returns 0 when `whole` is 0.
pub fn percentage(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    ((200 * part + whole) / (2 * whole)) as u8
}

/// Mutable progress through one topic. Dropping it discards the run.
#[derive(Debug, Clone)]
pub struct Session {
    topic: Arc<Topic>,
    phase: Phase,
    selections: Vec<Option<usize>>,
    score: u32,
    pass_threshold: u8,
}

impl Session {
    pub fn new(topic: Arc<Topic>) -> Self {
        let len = topic.len();
        Self {
            topic,
            phase: Phase::InProgress {
                index: 0,
                item: ItemState::Unanswered,
            },
            selections: vec![None; len],
            score: 0,
            pass_threshold: PASS_THRESHOLD_PERCENT,
        }
    }

    /// Override the pass threshold (clamped to 0..=100).
    pub fn with_pass_threshold(mut self, threshold: u8) -> Self {
        self.pass_threshold = threshold.min(100);
        self
    }

    pub fn topic(&self) -> &Arc<Topic> {
        &self.topic
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pass_threshold(&self) -> u8 {
        self.pass_threshold
    }

    /// Record a tentative choice for the current item. May be called again to
    /// change the choice until the item is revealed.
    pub fn select_choice(&mut self, choice: usize) -> Result<(), EngineError> {
        match &mut self.phase {
            Phase::Finished { .. } => Err(EngineError::invalid("select a choice", "finished")),
            Phase::InProgress { index, item } => {
                if let ItemState::Revealed { .. } = item {
                    return Err(EngineError::invalid("select a choice", "revealed"));
                }
                let len = self.topic.items()[*index].choices().len();
                if choice >= len {
                    return Err(EngineError::ChoiceOutOfRange { choice, len });
                }
                *item = ItemState::Selected { choice };
                tracing::debug!(index = *index, choice, "choice selected");
                Ok(())
            }
        }
    }

    /// Lock in the selection and expose its correctness.
    pub fn reveal(&mut self) -> Result<Reveal, EngineError> {
        let (index, choice) = match self.phase {
            Phase::InProgress {
                index,
                item: ItemState::Selected { choice },
            } => (index, choice),
            Phase::InProgress { item, .. } => {
                return Err(EngineError::invalid("reveal", item.name()));
            }
            Phase::Finished { .. } => return Err(EngineError::invalid("reveal", "finished")),
        };

        let item = &self.topic.items()[index];
        let correct = item.is_correct(choice);
        if correct {
            self.score += 1;
        }
        self.selections[index] = Some(choice);
        self.phase = Phase::InProgress {
            index,
            item: ItemState::Revealed { choice, correct },
        };
        tracing::debug!(index, choice, correct, score = self.score, "item revealed");

        Ok(Reveal {
            item_index: index,
            choice,
            correct,
            correct_choice: item.correct_choice(),
            feedback: item.choices()[choice].feedback().map(str::to_owned),
            explanation: item.explanation().to_owned(),
        })
    }

    /// Move past a revealed item, finishing the session after the last one.
    pub fn advance(&mut self) -> Result<Advance, EngineError> {
        let index = match self.phase {
            Phase::InProgress {
                index,
                item: ItemState::Revealed { .. },
            } => index,
            Phase::InProgress { item, .. } => {
                return Err(EngineError::invalid("advance", item.name()));
            }
            Phase::Finished { .. } => return Err(EngineError::invalid("advance", "finished")),
        };

        if index + 1 < self.topic.len() {
            self.phase = Phase::InProgress {
                index: index + 1,
                item: ItemState::Unanswered,
            };
            return Ok(Advance::Next { index: index + 1 });
        }

        let outcome = self.tally();
        self.phase = Phase::Finished {
            percentage: outcome.percentage,
        };
        tracing::info!(
            topic = self.topic.key(),
            score = outcome.score,
            total = outcome.total,
            percentage = outcome.percentage,
            passed = outcome.passed,
            "session finished"
        );
        Ok(Advance::Finished(outcome))
    }

    /// Return to the first item with no selections and no score.
    pub fn restart(&mut self) {
        self.phase = Phase::InProgress {
            index: 0,
            item: ItemState::Unanswered,
        };
        self.selections.iter_mut().for_each(|s| *s = None);
        self.score = 0;
    }

    fn total(&self) -> u32 {
        u32::try_from(self.topic.len()).unwrap_or(u32::MAX)
    }

    fn tally(&self) -> Outcome {
        let total = self.total();
        let percentage = percentage(self.score, total);
        Outcome {
            score: self.score,
            total,
            percentage,
            passed: percentage >= self.pass_threshold,
        }
    }

    /// Index of the current item; `None` once finished.
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            Phase::InProgress { index, .. } => Some(index),
            Phase::Finished { .. } => None,
        }
    }

    /// The item being answered; `None` once finished.
    pub fn current_item(&self) -> Option<&Item> {
        self.current_index().map(|i| &self.topic.items()[i])
    }

    /// The choice made for the current item, tentative or revealed.
    pub fn selection(&self) -> Option<usize> {
        match self.phase {
            Phase::InProgress {
                item: ItemState::Selected { choice } | ItemState::Revealed { choice, .. },
                ..
            } => Some(choice),
            _ => None,
        }
    }

    pub fn is_revealed(&self) -> bool {
        matches!(
            self.phase,
            Phase::InProgress {
                item: ItemState::Revealed { .. },
                ..
            }
        )
    }

    /// Running count of correct reveals.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn len(&self) -> usize {
        self.topic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topic.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    /// Final percentage; `None` until finished.
    pub fn percentage(&self) -> Option<u8> {
        match self.phase {
            Phase::Finished { percentage } => Some(percentage),
            Phase::InProgress { .. } => None,
        }
    }

    /// Whether the finished session met the pass threshold.
    pub fn passed(&self) -> Option<bool> {
        self.percentage().map(|p| p >= self.pass_threshold)
    }

    /// Final tally; `None` until finished.
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_finished().then(|| self.tally())
    }

    /// Recorded selections, one slot per item.
    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }

    pub fn progress(&self) -> Progress {
        let total = self.topic.len();
        let position = self.current_index().map_or(total, |i| i + 1);
        Progress {
            position,
            total,
            percent: percentage(
                u32::try_from(position).unwrap_or(u32::MAX),
                self.total(),
            ),
        }
    }

    /// Per-item answer review; only available once finished.
    pub fn review(&self) -> Option<Vec<ReviewEntry<'_>>> {
        if !self.is_finished() {
            return None;
        }
        Some(
            self.topic
                .items()
                .iter()
                .zip(&self.selections)
                .map(|(item, selected)| ReviewEntry {
                    item,
                    selected: *selected,
                    correct: selected.is_some_and(|c| item.is_correct(c)),
                })
                .collect(),
        )
    }
}
