//! Immutable topic registry.
//!
//! The built-in topics are compiled into the binary; content packs loaded
//! from disk can be added before the store is handed to the rest of the app.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ContentError;
use crate::model::{Topic, TopicKind};
use crate::parser;

/// Key of the topic the legacy fallback policy substituted on a miss.
pub const DEFAULT_FALLBACK_TOPIC: &str = "fire-safety";

const BUILTIN_PACKS: &[(&str, &str)] = &[
    ("fire-safety.toml", include_str!("../content/fire-safety.toml")),
    (
        "flood-preparedness.toml",
        include_str!("../content/flood-preparedness.toml"),
    ),
    ("fire-drill.toml", include_str!("../content/fire-drill.toml")),
];

/// Read-only mapping from topic key to topic.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    topics: BTreeMap<String, Arc<Topic>>,
    fallback: Option<String>,
}

impl ContentStore {
    /// An empty store with no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in quizzes and drills.
    pub fn builtin() -> Result<Self, ContentError> {
        let mut store = Self::new();
        for (name, source) in BUILTIN_PACKS {
            let topic = parser::parse_topic_str(source, &PathBuf::from(name))?;
            store.insert(topic)?;
        }
        Ok(store)
    }

    /// Register a topic. Keys are unique.
    pub fn insert(&mut self, topic: Topic) -> Result<(), ContentError> {
        if self.topics.contains_key(topic.key()) {
            return Err(ContentError::DuplicateTopic(topic.key().to_string()));
        }
        tracing::debug!(key = topic.key(), items = topic.len(), "registered topic");
        self.topics.insert(topic.key().to_string(), Arc::new(topic));
        Ok(())
    }

    /// Load every content pack under `dir` and register it. Returns the number
    /// of topics added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ContentError> {
        let topics = parser::load_content_dir(dir)?;
        let count = topics.len();
        for topic in topics {
            self.insert(topic)?;
        }
        Ok(count)
    }

    /// Enable the legacy policy of substituting `key` for unknown lookups.
    ///
    /// Off by default: a typo'd key silently yielding unrelated content is
    /// rarely what the caller wants.
    pub fn with_fallback(mut self, key: impl Into<String>) -> Self {
        self.fallback = Some(key.into());
        self
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Fetch the topic registered under `key`.
    ///
    /// Returns `ContentError::NotFound` on a miss, unless a fallback is
    /// configured and itself resolves.
    pub fn lookup(&self, key: &str) -> Result<Arc<Topic>, ContentError> {
        if let Some(topic) = self.topics.get(key) {
            return Ok(Arc::clone(topic));
        }

        if let Some(fallback) = &self.fallback {
            if let Some(topic) = self.topics.get(fallback) {
                tracing::warn!(
                    requested = key,
                    fallback = fallback.as_str(),
                    "unknown topic, using fallback"
                );
                return Ok(Arc::clone(topic));
            }
        }

        Err(ContentError::NotFound(key.to_string()))
    }

    /// All topics in key order.
    pub fn topics(&self) -> impl Iterator<Item = &Arc<Topic>> {
        self.topics.values()
    }

    /// Topics of one kind, in key order.
    pub fn topics_of(&self, kind: TopicKind) -> impl Iterator<Item = &Arc<Topic>> {
        self.topics.values().filter(move |t| t.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    #[test]
    fn builtin_content_loads() {
        let store = ContentStore::builtin().unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.lookup("fire-safety").unwrap().len(), 3);
        assert_eq!(store.lookup("flood-preparedness").unwrap().len(), 2);

        let drill = store.lookup("fire-drill").unwrap();
        assert_eq!(drill.kind(), TopicKind::Drill);
        assert_eq!(drill.items()[2].correct_choice(), 0);
        assert!(drill
            .items()
            .iter()
            .all(|i| i.choices().iter().all(|c| c.feedback().is_some())));
    }

    #[test]
    fn unknown_key_is_not_found_by_default() {
        let store = ContentStore::builtin().unwrap();
        let err = store.lookup("foo").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "topic not found: foo");
    }

    #[test]
    fn unknown_key_uses_fallback_when_enabled() {
        let store = ContentStore::builtin()
            .unwrap()
            .with_fallback(DEFAULT_FALLBACK_TOPIC);
        let topic = store.lookup("foo").unwrap();
        assert_eq!(topic.key(), "fire-safety");
    }

    #[test]
    fn dangling_fallback_still_reports_not_found() {
        let store = ContentStore::builtin().unwrap().with_fallback("missing");
        assert!(store.lookup("foo").unwrap_err().is_not_found());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut store = ContentStore::builtin().unwrap();
        let item = Item::quiz(1, "Q?", ["a", "b"], 0, "").unwrap();
        let dup = Topic::new("fire-safety", "Again", "", TopicKind::Quiz, vec![item]).unwrap();
        assert!(matches!(
            store.insert(dup).unwrap_err(),
            ContentError::DuplicateTopic(_)
        ));
    }

    #[test]
    fn topics_of_filters_by_kind() {
        let store = ContentStore::builtin().unwrap();
        let quizzes: Vec<&str> = store.topics_of(TopicKind::Quiz).map(|t| t.key()).collect();
        assert_eq!(quizzes, vec!["fire-safety", "flood-preparedness"]);
        assert_eq!(store.topics_of(TopicKind::Drill).count(), 1);
    }
}
