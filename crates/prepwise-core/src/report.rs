//! Session reports with JSON persistence, and the attempt records that feed
//! the dashboards.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Session;
use crate::model::TopicKind;

/// A finished session, self-contained enough to review later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    pub topic_key: String,
    pub topic_title: String,
    pub kind: TopicKind,
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
    pub passed: bool,
    /// Badge earned by passing; `None` when not passed.
    pub badge: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// One entry per item, in order.
    pub answers: Vec<AnswerReview>,
}

/// How one item was answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerReview {
    pub item_id: u32,
    pub prompt: String,
    pub choices: Vec<String>,
    pub selected: Option<usize>,
    pub correct_choice: usize,
    pub correct: bool,
    /// Feedback on the selected choice (drills only).
    #[serde(default)]
    pub feedback: Option<String>,
    pub explanation: String,
}

impl SessionReport {
    /// Build a report from a finished session; `None` while still in progress.
    pub fn from_session(
        session: &Session,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Option<Self> {
        let outcome = session.outcome()?;
        let review = session.review()?;
        let topic = session.topic();

        let answers = review
            .iter()
            .map(|entry| AnswerReview {
                item_id: entry.item.id(),
                prompt: entry.item.prompt().to_string(),
                choices: entry
                    .item
                    .choices()
                    .iter()
                    .map(|c| c.text().to_string())
                    .collect(),
                selected: entry.selected,
                correct_choice: entry.item.correct_choice(),
                correct: entry.correct,
                feedback: entry
                    .selected
                    .and_then(|i| entry.item.choices().get(i))
                    .and_then(|c| c.feedback())
                    .map(str::to_owned),
                explanation: entry.item.explanation().to_string(),
            })
            .collect();

        Some(Self {
            id: Uuid::new_v4(),
            topic_key: topic.key().to_string(),
            topic_title: topic.title().to_string(),
            kind: topic.kind(),
            score: outcome.score,
            total: outcome.total,
            percentage: outcome.percentage,
            passed: outcome.passed,
            badge: outcome.passed.then(|| topic.badge()),
            started_at,
            completed_at,
            answers,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Items answered incorrectly.
    pub fn mistakes(&self) -> impl Iterator<Item = &AnswerReview> {
        self.answers.iter().filter(|a| !a.correct)
    }
}

/// One finished session in a user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub topic_key: String,
    pub topic_title: String,
    pub kind: TopicKind,
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn from_report(report: &SessionReport, user_id: &str, user_name: &str) -> Self {
        Self {
            id: report.id,
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            topic_key: report.topic_key.clone(),
            topic_title: report.topic_title.clone(),
            kind: report.kind,
            score: report.score,
            total: report.total,
            percentage: report.percentage,
            passed: report.passed,
            completed_at: report.completed_at,
        }
    }
}
