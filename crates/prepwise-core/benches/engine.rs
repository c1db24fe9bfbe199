use std::path::PathBuf;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prepwise_core::engine::percentage;
use prepwise_core::model::{Item, Topic, TopicKind};
use prepwise_core::parser::parse_topic_str;
use prepwise_core::{run_session, ContentStore, NoopReporter, ScriptedAnswers, Session};

fn large_topic(len: u32) -> Arc<Topic> {
    let items = (1..=len)
        .map(|id| {
            Item::quiz(
                id,
                format!("Question {id}"),
                ["first", "second", "third", "fourth"],
                (id % 4) as usize,
                "explanation",
            )
            .unwrap()
        })
        .collect();
    Arc::new(Topic::new("bench", "Bench", "", TopicKind::Quiz, items).unwrap())
}

fn bench_percentage(c: &mut Criterion) {
    c.bench_function("percentage", |b| {
        b.iter(|| percentage(black_box(67), black_box(91)))
    });
}

fn bench_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    let store = ContentStore::builtin().unwrap();
    let drill = store.lookup("fire-drill").unwrap();
    group.bench_function("fire-drill", |b| {
        b.iter(|| {
            let mut session = Session::new(Arc::clone(&drill));
            let mut answers = ScriptedAnswers::new(vec![1, 1, 0]);
            run_session(&mut session, &mut answers, &NoopReporter).unwrap()
        })
    });

    let topic = large_topic(500);
    let picks: Vec<usize> = (0..500).map(|i| i % 4).collect();
    group.bench_function("500 items", |b| {
        b.iter(|| {
            let mut session = Session::new(Arc::clone(&topic));
            for &choice in &picks {
                session.select_choice(choice).unwrap();
                session.reveal().unwrap();
                session.advance().unwrap();
            }
            black_box(session.outcome())
        })
    });

    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    let source = include_str!("../content/fire-drill.toml");
    let path = PathBuf::from("fire-drill.toml");
    c.bench_function("parse fire-drill", |b| {
        b.iter(|| parse_topic_str(black_box(source), &path).unwrap())
    });
}

criterion_group!(benches, bench_percentage, bench_sessions, bench_parsing);
criterion_main!(benches);
