//! Dashboard statistics computed from attempt history.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::ContentStore;
use crate::engine::percentage;
use crate::report::AttemptRecord;

/// Points awarded per correctly answered item.
pub const POINTS_PER_CORRECT: u32 = 10;

/// Points needed to climb one level.
pub const POINTS_PER_LEVEL: u32 = 100;

/// Level reached with `points`; everyone starts at level 1.
pub fn level_for(points: u32) -> u32 {
    1 + points / POINTS_PER_LEVEL
}

/// Points, level, and badges, derived from a student's attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentProgress {
    pub points: u32,
    pub level: u32,
    /// Badge names in the order earned.
    pub badges: Vec<String>,
}

/// Progress of the student identified by `user_id`.
pub fn student_progress(user_id: &str, attempts: &[AttemptRecord]) -> StudentProgress {
    progress_of(attempts.iter().filter(|a| a.user_id == user_id))
}

fn progress_of<'a>(runs: impl Iterator<Item = &'a AttemptRecord> + Clone) -> StudentProgress {
    let points = runs.clone().map(|a| a.score * POINTS_PER_CORRECT).sum();
    StudentProgress {
        points,
        level: level_for(points),
        badges: earned_badges(runs),
    }
}

/// Per-topic summary for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicProgress {
    pub topic_key: String,
    pub topic_title: String,
    pub attempts: usize,
    /// Best percentage so far; `None` if never attempted.
    pub best_percentage: Option<u8>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentDashboard {
    pub topics: Vec<TopicProgress>,
    pub topics_completed: usize,
    pub total_topics: usize,
    /// Mean percentage over all attempts.
    pub average_percentage: Option<u8>,
    pub progress: StudentProgress,
}

/// Summarize one student's history against the available topics.
pub fn student_dashboard(
    user_id: &str,
    attempts: &[AttemptRecord],
    topics: &ContentStore,
) -> StudentDashboard {
    let mine: Vec<&AttemptRecord> = attempts.iter().filter(|a| a.user_id == user_id).collect();

    let topics: Vec<TopicProgress> = topics
        .topics()
        .map(|topic| {
            let runs: Vec<&&AttemptRecord> =
                mine.iter().filter(|a| a.topic_key == topic.key()).collect();
            TopicProgress {
                topic_key: topic.key().to_string(),
                topic_title: topic.title().to_string(),
                attempts: runs.len(),
                best_percentage: runs.iter().map(|a| a.percentage).max(),
                completed: runs.iter().any(|a| a.passed),
            }
        })
        .collect();

    StudentDashboard {
        topics_completed: topics.iter().filter(|t| t.completed).count(),
        total_topics: topics.len(),
        average_percentage: mean_percentage(mine.iter().map(|a| a.percentage)),
        progress: progress_of(mine.iter().copied()),
        topics,
    }
}

/// Class-wide module completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleProgress {
    pub topic_key: String,
    pub topic_title: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Performer {
    pub name: String,
    pub points: u32,
    pub level: u32,
    pub badges: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub student: String,
    pub action: String,
    pub percentage: u8,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDashboard {
    pub total_students: usize,
    /// Students with an attempt in the last 24 hours.
    pub active_today: usize,
    pub average_score: Option<u8>,
    /// Completed student/topic pairs over all student/topic pairs.
    pub completion_rate: u8,
    pub top_performers: Vec<Performer>,
    pub modules: Vec<ModuleProgress>,
    pub recent_activity: Vec<Activity>,
}

const TOP_PERFORMERS: usize = 3;
const RECENT_ACTIVITY: usize = 5;

/// Summarize every student's history for the teacher view.
///
/// `attempts` holds student attempts only; `user_id` identifies a student
/// across logins.
pub fn class_dashboard(
    attempts: &[AttemptRecord],
    topics: &ContentStore,
    now: DateTime<Utc>,
) -> ClassDashboard {
    let mut by_student: BTreeMap<&str, Vec<&AttemptRecord>> = BTreeMap::new();
    for attempt in attempts {
        by_student.entry(&attempt.user_id).or_default().push(attempt);
    }
    let total_students = by_student.len();

    let active_today = by_student
        .values()
        .filter(|runs| {
            runs.iter()
                .any(|a| now.signed_duration_since(a.completed_at).num_hours() < 24)
        })
        .count();

    let modules: Vec<ModuleProgress> = topics
        .topics()
        .map(|topic| {
            let completed = by_student
                .values()
                .filter(|runs| {
                    runs.iter()
                        .any(|a| a.topic_key == topic.key() && a.passed)
                })
                .count();
            ModuleProgress {
                topic_key: topic.key().to_string(),
                topic_title: topic.title().to_string(),
                completed,
                total: total_students,
                percentage: percentage(to_u32(completed), to_u32(total_students)),
            }
        })
        .collect();

    let completed_pairs: usize = modules.iter().map(|m| m.completed).sum();
    let completion_rate = percentage(
        to_u32(completed_pairs),
        to_u32(total_students * modules.len()),
    );

    let mut top_performers: Vec<Performer> = by_student
        .values()
        .map(|runs| {
            let progress = progress_of(runs.iter().copied());
            Performer {
                name: runs
                    .last()
                    .map(|a| a.user_name.clone())
                    .unwrap_or_default(),
                points: progress.points,
                level: progress.level,
                badges: progress.badges.len(),
            }
        })
        .collect();
    top_performers.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.name.cmp(&b.name)));
    top_performers.truncate(TOP_PERFORMERS);

    let mut recent: Vec<&AttemptRecord> = attempts.iter().collect();
    recent.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    let recent_activity = recent
        .into_iter()
        .take(RECENT_ACTIVITY)
        .map(|a| Activity {
            student: a.user_name.clone(),
            action: format!("Completed {}", a.topic_title),
            percentage: a.percentage,
            when: relative_time(a.completed_at, now),
        })
        .collect();

    ClassDashboard {
        total_students,
        active_today,
        average_score: mean_percentage(attempts.iter().map(|a| a.percentage)),
        completion_rate,
        top_performers,
        modules,
        recent_activity,
    }
}

/// Human-readable age of `then`, e.g. "2 hours ago".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };
    match elapsed.num_minutes() {
        m if m < 1 => "just now".to_string(),
        m if m < 60 => plural(m, "minute"),
        _ if elapsed.num_hours() < 24 => plural(elapsed.num_hours(), "hour"),
        _ => plural(elapsed.num_days(), "day"),
    }
}

/// Distinct badge names, in the order they were first earned.
fn earned_badges<'a>(runs: impl Iterator<Item = &'a AttemptRecord>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut runs: Vec<&AttemptRecord> = runs.filter(|a| a.passed).collect();
    runs.sort_by_key(|a| a.completed_at);
    runs.into_iter()
        .map(|a| a.kind.badge_for(&a.topic_title))
        .filter(|b| seen.insert(b.clone()))
        .collect()
}

fn mean_percentage(values: impl Iterator<Item = u8>) -> Option<u8> {
    let (sum, count) = values.fold((0u32, 0u32), |(s, c), v| (s + u32::from(v), c + 1));
    (count > 0).then(|| {
        let mean = (2 * sum + count) / (2 * count);
        u8::try_from(mean).unwrap_or(100)
    })
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::model::TopicKind;

    fn attempt(
        user: &str,
        topic: &str,
        kind: TopicKind,
        score: u32,
        total: u32,
        at: DateTime<Utc>,
    ) -> AttemptRecord {
        let pct = percentage(score, total);
        let title = match topic {
            "fire-safety" => "Fire Safety",
            "flood-preparedness" => "Flood Preparedness",
            _ => "Fire Emergency Drill",
        };
        AttemptRecord {
            id: Uuid::new_v4(),
            user_id: user.to_string(),
            user_name: user.to_string(),
            topic_key: topic.to_string(),
            topic_title: title.to_string(),
            kind,
            score,
            total,
            percentage: pct,
            passed: pct >= 80,
            completed_at: at,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    fn history() -> Vec<AttemptRecord> {
        let now = now();
        vec![
            attempt("ana", "fire-safety", TopicKind::Quiz, 2, 3, now - Duration::hours(30)),
            attempt("ana", "fire-safety", TopicKind::Quiz, 3, 3, now - Duration::hours(5)),
            attempt("ana", "fire-drill", TopicKind::Drill, 3, 3, now - Duration::hours(2)),
            attempt("ben", "flood-preparedness", TopicKind::Quiz, 1, 2, now - Duration::days(3)),
        ]
    }

    #[test]
    fn levels_follow_points() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(150), 2);
    }

    #[test]
    fn student_dashboard_summarizes_own_attempts() {
        let store = ContentStore::builtin().unwrap();
        let dash = student_dashboard("ana", &history(), &store);

        assert_eq!(dash.total_topics, 3);
        assert_eq!(dash.topics_completed, 2);
        assert_eq!(dash.progress.points, 80);
        assert_eq!(dash.progress.level, 1);
        assert_eq!(dash.average_percentage, Some(89));
        assert_eq!(dash.progress, student_progress("ana", &history()));
        assert_eq!(
            dash.progress.badges,
            vec!["Fire Safety".to_string(), "Emergency Response Certified".to_string()]
        );

        let fire = dash.topics.iter().find(|t| t.topic_key == "fire-safety").unwrap();
        assert_eq!(fire.attempts, 2);
        assert_eq!(fire.best_percentage, Some(100));
        let flood = dash
            .topics
            .iter()
            .find(|t| t.topic_key == "flood-preparedness")
            .unwrap();
        assert_eq!(flood.best_percentage, None);
    }

    #[test]
    fn student_dashboard_without_history() {
        let store = ContentStore::builtin().unwrap();
        let dash = student_dashboard("nobody", &history(), &store);
        assert_eq!(dash.progress.points, 0);
        assert_eq!(dash.progress.level, 1);
        assert_eq!(dash.average_percentage, None);
        assert!(dash.progress.badges.is_empty());
    }

    #[test]
    fn class_dashboard_aggregates_students() {
        let store = ContentStore::builtin().unwrap();
        let dash = class_dashboard(&history(), &store, now());

        assert_eq!(dash.total_students, 2);
        assert_eq!(dash.active_today, 1);
        // (67 + 100 + 100 + 50) / 4
        assert_eq!(dash.average_score, Some(79));
        // 2 completed pairs out of 2 students x 3 topics
        assert_eq!(dash.completion_rate, 33);

        assert_eq!(dash.top_performers[0].name, "ana");
        assert_eq!(dash.top_performers[0].badges, 2);
        assert_eq!(dash.top_performers[1].points, 10);

        let fire = dash.modules.iter().find(|m| m.topic_key == "fire-safety").unwrap();
        assert_eq!((fire.completed, fire.total, fire.percentage), (1, 2, 50));

        assert_eq!(dash.recent_activity.len(), 4);
        assert_eq!(dash.recent_activity[0].action, "Completed Fire Emergency Drill");
        assert_eq!(dash.recent_activity[0].when, "2 hours ago");
        assert_eq!(dash.recent_activity[3].when, "3 days ago");
    }

    #[test]
    fn repeated_logins_count_as_one_student() {
        let store = ContentStore::builtin().unwrap();
        let now = now();
        let mut history = history();
        // Same student, later login: a new record id, same identity key.
        history.push(attempt("ben", "flood-preparedness", TopicKind::Quiz, 2, 2, now));
        history.push(attempt("ben", "fire-drill", TopicKind::Drill, 3, 3, now));

        let dash = class_dashboard(&history, &store, now);
        assert_eq!(dash.total_students, 2);
        assert_eq!(dash.active_today, 2);
        let ben = dash.top_performers.iter().find(|p| p.name == "ben").unwrap();
        assert_eq!(ben.points, 60);
        assert_eq!(ben.badges, 2);
        assert_eq!(student_progress("ben", &history).points, 60);
    }

    #[test]
    fn empty_class() {
        let store = ContentStore::builtin().unwrap();
        let dash = class_dashboard(&[], &store, now());
        assert_eq!(dash.total_students, 0);
        assert_eq!(dash.completion_rate, 0);
        assert_eq!(dash.average_score, None);
        assert!(dash.top_performers.is_empty());
    }

    #[test]
    fn relative_time_units() {
        let now = now();
        assert_eq!(relative_time(now, now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(relative_time(now - Duration::hours(49), now), "2 days ago");
    }
}
