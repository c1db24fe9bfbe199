//! Core data model types for prepwise.
//!
//! Topics (quizzes and drill scenarios) are built once, validated, and then
//! shared immutably behind `Arc`. Every constructor enforces the item
//! invariants.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// One answer option on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    text: String,
    is_correct: bool,
    feedback: Option<String>,
}

impl Choice {
    /// A choice without per-option feedback (quiz style).
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
            feedback: None,
        }
    }

    /// A choice carrying feedback shown after reveal (drill style).
    pub fn with_feedback(
        text: impl Into<String>,
        is_correct: bool,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            is_correct,
            feedback: Some(feedback.into()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }
}

/// A single quiz question or drill situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: u32,
    prompt: String,
    choices: Vec<Choice>,
    correct_choice: usize,
    explanation: String,
}

impl Item {
    /// Build an item, validating that exactly one choice is flagged correct and
    /// that it sits at `correct_choice`.
    pub fn new(
        id: u32,
        prompt: impl Into<String>,
        choices: Vec<Choice>,
        correct_choice: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, ContentError> {
        if choices.is_empty() {
            return Err(ContentError::EmptyChoices { item_id: id });
        }
        if correct_choice >= choices.len() {
            return Err(ContentError::CorrectChoiceOutOfRange {
                item_id: id,
                index: correct_choice,
                len: choices.len(),
            });
        }
        let flagged: Vec<usize> = choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_correct)
            .map(|(i, _)| i)
            .collect();
        if flagged != [correct_choice] {
            return Err(ContentError::CorrectFlagMismatch {
                item_id: id,
                index: correct_choice,
            });
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            choices,
            correct_choice,
            explanation: explanation.into(),
        })
    }

    /// Build a quiz item from plain option texts; correctness flags are derived
    /// from `correct_choice`.
    pub fn quiz<S: Into<String>>(
        id: u32,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct_choice: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let choices = options
            .into_iter()
            .enumerate()
            .map(|(i, text)| Choice::new(text, i == correct_choice))
            .collect();
        Self::new(id, prompt, choices, correct_choice, explanation)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn correct_choice(&self) -> usize {
        self.correct_choice
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether `choice` is the correct answer for this item.
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_choice
    }
}

/// Whether a topic is a flat quiz or a drill scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Quiz,
    Drill,
}

impl TopicKind {
    /// Badge awarded for passing a topic of this kind titled `title`.
    pub fn badge_for(self, title: &str) -> String {
        match self {
            TopicKind::Quiz => title.to_string(),
            TopicKind::Drill => "Emergency Response Certified".to_string(),
        }
    }
}

impl fmt::Display for TopicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicKind::Quiz => write!(f, "quiz"),
            TopicKind::Drill => write!(f, "drill"),
        }
    }
}

impl FromStr for TopicKind {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quiz" => Ok(TopicKind::Quiz),
            "drill" | "scenario" => Ok(TopicKind::Drill),
            other => Err(ContentError::UnknownKind(other.to_string())),
        }
    }
}

/// A named, ordered collection of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    key: String,
    title: String,
    description: String,
    kind: TopicKind,
    items: Vec<Item>,
}

impl Topic {
    /// Build a topic. Fails on a blank key, an empty item list, or duplicate
    /// item ids.
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: TopicKind,
        items: Vec<Item>,
    ) -> Result<Self, ContentError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ContentError::EmptyKey);
        }
        if items.is_empty() {
            return Err(ContentError::EmptyTopic(key));
        }
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(ContentError::DuplicateItemId {
                    topic: key,
                    item_id: item.id,
                });
            }
        }

        Ok(Self {
            key,
            title: title.into(),
            description: description.into(),
            kind,
            items,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> TopicKind {
        self.kind
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items; always at least one.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`: empty topics are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The badge a student earns by passing this topic.
    pub fn badge(&self) -> String {
        self.kind.badge_for(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(id: u32) -> Item {
        Item::quiz(id, "Q?", ["a", "b", "c"], 1, "because b").unwrap()
    }

    #[test]
    fn quiz_item_derives_flags() {
        let item = sample_item(1);
        assert!(!item.choices()[0].is_correct());
        assert!(item.choices()[1].is_correct());
        assert!(item.is_correct(1));
        assert!(!item.is_correct(2));
    }

    #[test]
    fn item_rejects_empty_choices() {
        let err = Item::new(7, "Q?", vec![], 0, "").unwrap_err();
        assert!(matches!(err, ContentError::EmptyChoices { item_id: 7 }));
    }

    #[test]
    fn item_rejects_out_of_range_correct_choice() {
        let err = Item::quiz(1, "Q?", ["a", "b"], 2, "").unwrap_err();
        assert!(matches!(
            err,
            ContentError::CorrectChoiceOutOfRange { index: 2, len: 2, .. }
        ));
    }

    #[test]
    fn drill_item_requires_flag_at_correct_index() {
        let choices = vec![
            Choice::with_feedback("run", true, "no"),
            Choice::with_feedback("walk", false, "yes"),
        ];
        let err = Item::new(1, "Q?", choices, 1, "").unwrap_err();
        assert!(matches!(err, ContentError::CorrectFlagMismatch { .. }));

        let two_correct = vec![Choice::new("a", true), Choice::new("b", true)];
        assert!(Item::new(1, "Q?", two_correct, 0, "").is_err());
    }

    #[test]
    fn topic_rejects_empty_and_duplicates() {
        assert!(matches!(
            Topic::new("t", "T", "", TopicKind::Quiz, vec![]).unwrap_err(),
            ContentError::EmptyTopic(_)
        ));
        assert!(matches!(
            Topic::new("  ", "T", "", TopicKind::Quiz, vec![sample_item(1)]).unwrap_err(),
            ContentError::EmptyKey
        ));
        let err = Topic::new(
            "t",
            "T",
            "",
            TopicKind::Quiz,
            vec![sample_item(1), sample_item(1)],
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateItemId { item_id: 1, .. }));
    }

    #[test]
    fn topic_kind_display_and_parse() {
        assert_eq!(TopicKind::Quiz.to_string(), "quiz");
        assert_eq!("Drill".parse::<TopicKind>().unwrap(), TopicKind::Drill);
        assert_eq!("scenario".parse::<TopicKind>().unwrap(), TopicKind::Drill);
        assert!("exam".parse::<TopicKind>().is_err());
    }

    #[test]
    fn badge_depends_on_kind() {
        let quiz = Topic::new("q", "Fire Safety", "", TopicKind::Quiz, vec![sample_item(1)]).unwrap();
        let drill = Topic::new("d", "Fire Drill", "", TopicKind::Drill, vec![sample_item(1)]).unwrap();
        assert_eq!(quiz.badge(), "Fire Safety");
        assert_eq!(drill.badge(), "Emergency Response Certified");
    }
}
