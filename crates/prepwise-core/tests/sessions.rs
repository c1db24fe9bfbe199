//! Full sessions against the built-in content.

use std::sync::Arc;

use prepwise_core::engine::{ItemState, Phase};
use prepwise_core::{
    run_session, Advance, ContentStore, EngineError, NoopReporter, RunOutcome, ScriptedAnswers,
    Session, TopicKind,
};

fn store() -> ContentStore {
    ContentStore::builtin().unwrap()
}

fn play(session: &mut Session, picks: &[usize]) -> Option<u8> {
    for &pick in picks {
        session.select_choice(pick).unwrap();
        session.reveal().unwrap();
        session.advance().unwrap();
    }
    session.percentage()
}

#[test]
fn fire_safety_all_correct_passes() {
    let topic = store().lookup("fire-safety").unwrap();
    let picks: Vec<usize> = topic.items().iter().map(|i| i.correct_choice()).collect();
    let mut session = Session::new(topic);
    assert_eq!(play(&mut session, &picks), Some(100));
    assert_eq!(session.passed(), Some(true));
}

#[test]
fn flood_quiz_half_right_fails() {
    let topic = store().lookup("flood-preparedness").unwrap();
    let right = topic.items()[0].correct_choice();
    let wrong = (topic.items()[1].correct_choice() + 1) % topic.items()[1].choices().len();
    let mut session = Session::new(topic);
    assert_eq!(play(&mut session, &[right, wrong]), Some(50));
    assert_eq!(session.passed(), Some(false));
}

#[test]
fn drill_reveal_exposes_feedback_and_explanation() {
    let topic = store().lookup("fire-drill").unwrap();
    assert_eq!(topic.kind(), TopicKind::Drill);
    let mut session = Session::new(topic);

    session.select_choice(0).unwrap();
    let reveal = session.reveal().unwrap();
    assert!(!reveal.correct);
    assert_eq!(reveal.correct_choice, 1);
    assert_eq!(
        reveal.feedback.as_deref(),
        Some("Never delay evacuation for personal items or tasks.")
    );
    assert!(reveal.explanation.starts_with("In a fire emergency"));
}

#[test]
fn advance_before_reveal_keeps_position() {
    let mut session = Session::new(store().lookup("fire-drill").unwrap());
    session.select_choice(1).unwrap();
    let err = session.advance().unwrap_err();
    assert!(matches!(err, EngineError::InvalidState { .. }));
    assert_eq!(
        session.phase(),
        Phase::InProgress {
            index: 0,
            item: ItemState::Selected { choice: 1 }
        }
    );
}

#[test]
fn restart_and_replay_gives_same_percentage() {
    let mut session = Session::new(store().lookup("fire-drill").unwrap());
    let first = play(&mut session, &[1, 0, 0]);
    session.restart();
    session.restart();
    assert_eq!(session.score(), 0);
    assert_eq!(session.current_index(), Some(0));
    assert!(!session.is_finished());
    assert_eq!(play(&mut session, &[1, 0, 0]), first);
    assert_eq!(first, Some(67));
}

#[test]
fn score_never_exceeds_length() {
    let mut session = Session::new(store().lookup("fire-safety").unwrap());
    let len = session.len() as u32;
    for _ in 0..session.len() {
        let correct = session.current_item().unwrap().correct_choice();
        session.select_choice(correct).unwrap();
        session.reveal().unwrap();
        assert!(session.score() <= len);
        if let Advance::Finished(outcome) = session.advance().unwrap() {
            assert_eq!(outcome.score, len);
        }
    }
    assert!(session.reveal().is_err());
}

#[test]
fn driver_over_builtin_drill() {
    let store = store();
    let mut session = Session::new(store.lookup("fire-drill").unwrap()).with_pass_threshold(60);
    let mut answers = ScriptedAnswers::parse_one_based("2,1,1").unwrap();
    let RunOutcome::Completed(report) =
        run_session(&mut session, &mut answers, &NoopReporter).unwrap()
    else {
        panic!("expected completion");
    };
    assert_eq!(report.percentage, 67);
    assert!(report.passed);
    assert_eq!(report.badge.as_deref(), Some("Emergency Response Certified"));
}

#[test]
fn unknown_topic_lookup() {
    assert!(store().lookup("foo").unwrap_err().is_not_found());
    let fallback = store().with_fallback("fire-safety");
    let topic = fallback.lookup("foo").unwrap();
    assert!(Arc::ptr_eq(&topic, &fallback.lookup("fire-safety").unwrap()));
}
