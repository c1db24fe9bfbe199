//! TOML content-pack parser.
//!
//! Loads topics from TOML files and directories, and validates them for
//! authoring mistakes that are legal but probably unintended.

use std::path::Path;

use serde::Deserialize;

use crate::error::ContentError;
use crate::model::{Choice, Item, Topic, TopicKind};

/// Intermediate TOML structure for a content-pack file.
#[derive(Debug, Deserialize)]
struct TomlTopicFile {
    topic: TomlTopicHeader,
    #[serde(default)]
    items: Vec<TomlItem>,
}

#[derive(Debug, Deserialize)]
struct TomlTopicHeader {
    key: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_kind")]
    kind: String,
}

fn default_kind() -> String {
    "quiz".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    id: u32,
    prompt: String,
    correct: usize,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    choices: Vec<TomlChoice>,
}

/// Quizzes list plain strings; drills list tables with feedback.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlChoice {
    Plain(String),
    Detailed {
        text: String,
        #[serde(default)]
        correct: Option<bool>,
        #[serde(default)]
        feedback: Option<String>,
    },
}

impl TomlItem {
    fn into_item(self) -> Result<Item, ContentError> {
        // Explicit per-choice flags are checked against `correct`; when none are
        // given the flags are derived from it.
        let explicit = self
            .choices
            .iter()
            .any(|c| matches!(c, TomlChoice::Detailed { correct: Some(_), .. }));

        let choices = self
            .choices
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let derived = i == self.correct;
                match c {
                    TomlChoice::Plain(text) => Choice::new(text, !explicit && derived),
                    TomlChoice::Detailed {
                        text,
                        correct,
                        feedback,
                    } => {
                        let is_correct = if explicit {
                            correct.unwrap_or(false)
                        } else {
                            derived
                        };
                        match feedback {
                            Some(fb) => Choice::with_feedback(text, is_correct, fb),
                            None => Choice::new(text, is_correct),
                        }
                    }
                }
            })
            .collect();

        Item::new(self.id, self.prompt, choices, self.correct, self.explanation)
    }
}

/// Parse a single TOML file into a `Topic`.
pub fn parse_topic_file(path: &Path) -> Result<Topic, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_topic_str(&content, path)
}

/// Parse a TOML string into a `Topic`. `source_path` is only used in errors.
pub fn parse_topic_str(content: &str, source_path: &Path) -> Result<Topic, ContentError> {
    let parsed: TomlTopicFile = toml::from_str(content).map_err(|source| ContentError::Toml {
        path: source_path.to_path_buf(),
        source,
    })?;

    let kind: TopicKind = parsed.topic.kind.parse()?;
    let items = parsed
        .items
        .into_iter()
        .map(TomlItem::into_item)
        .collect::<Result<Vec<_>, _>>()?;

    Topic::new(
        parsed.topic.key,
        parsed.topic.title,
        parsed.topic.description,
        kind,
        items,
    )
}

/// Recursively load all `.toml` content packs from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_content_dir(dir: &Path) -> Result<Vec<Topic>, ContentError> {
    let mut topics = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|source| ContentError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    paths.sort();

    for path in paths {
        if path.is_dir() {
            topics.extend(load_content_dir(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_topic_file(&path) {
                Ok(topic) => topics.push(topic),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(topics)
}

/// A non-fatal authoring issue found by `validate_topic`.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The item id (if applicable).
    pub item_id: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Check a topic for likely authoring mistakes.
pub fn validate_topic(topic: &Topic) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if topic.title().trim().is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "topic title is empty".into(),
        });
    }

    if topic.len() < 2 {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "topic has a single item".into(),
        });
    }

    for item in topic.items() {
        if item.prompt().trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(item.id()),
                message: "prompt is empty".into(),
            });
        }

        if item.choices().len() < 2 {
            warnings.push(ValidationWarning {
                item_id: Some(item.id()),
                message: "only one choice; the answer is given away".into(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for choice in item.choices() {
            if !seen.insert(choice.text().trim().to_lowercase()) {
                warnings.push(ValidationWarning {
                    item_id: Some(item.id()),
                    message: format!("duplicate choice text: {}", choice.text()),
                });
            }
        }

        if item.explanation().trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(item.id()),
                message: "no explanation provided".into(),
            });
        }

        if topic.kind() == TopicKind::Drill && item.choices().iter().any(|c| c.feedback().is_none())
        {
            warnings.push(ValidationWarning {
                item_id: Some(item.id()),
                message: "drill choice without feedback".into(),
            });
        }
    }

    warnings
}
