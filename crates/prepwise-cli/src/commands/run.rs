//! The `prepwise quiz` and `prepwise drill` commands.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use prepwise_core::engine::percentage;
use prepwise_core::{
    run_session, AnswerSource, Item, Outcome, ProgressReporter, Reveal, RunOutcome,
    ScriptedAnswers, Session, TopicKind,
};

use super::{load_content, open_context, Globals};

/// Prints each step of the session to stdout.
struct ConsoleReporter {
    kind: TopicKind,
    pass_threshold: u8,
}

impl ProgressReporter for ConsoleReporter {
    fn on_item_start(&self, item: &Item, index: usize, total: usize) {
        let label = match self.kind {
            TopicKind::Quiz => "Question",
            TopicKind::Drill => "Step",
        };
        let to_u32 = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let through = percentage(to_u32(index).saturating_add(1), to_u32(total));
        println!("\n{label} {} of {total} ({through}%)", index + 1);
        println!("{}", item.prompt());
        for (n, choice) in item.choices().iter().enumerate() {
            println!("  {}. {}", n + 1, choice.text());
        }
    }

    fn on_reveal(&self, item: &Item, reveal: &Reveal) {
        if reveal.correct {
            println!("Correct!");
        } else {
            let right = item
                .choices()
                .get(reveal.correct_choice)
                .map_or("", |c| c.text());
            println!("Incorrect. The correct answer is: {right}");
        }
        if let Some(feedback) = &reveal.feedback {
            println!("{feedback}");
        }
        if !reveal.explanation.is_empty() {
            println!("Explanation: {}", reveal.explanation);
        }
    }

    fn on_finish(&self, outcome: &Outcome) {
        println!(
            "\nScore: {}/{} ({}%)",
            outcome.score, outcome.total, outcome.percentage
        );
        let verdict = match (self.kind, outcome.passed) {
            (TopicKind::Quiz, true) => "Passed!".to_string(),
            (TopicKind::Drill, true) => "Certified!".to_string(),
            (_, false) => format!("Not passed ({}% needed). Try again!", self.pass_threshold),
        };
        println!("{verdict}");
    }
}

/// Reads 1-based choices from a line-oriented reader; `q` or EOF quits.
struct PromptAnswers<R> {
    input: R,
}

impl<R: BufRead> AnswerSource for PromptAnswers<R> {
    fn next_choice(&mut self, item: &Item, _index: usize) -> Option<usize> {
        let len = item.choices().len();
        loop {
            print!("Your answer [1-{len}, q to quit]: ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                return None;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=len).contains(&n) => return Some(n - 1),
                _ => println!("Please enter a number from 1 to {len}."),
            }
        }
    }
}

pub fn execute(
    globals: &Globals,
    kind: TopicKind,
    key: &str,
    answers: Option<String>,
    report_out: Option<PathBuf>,
) -> Result<()> {
    let config = globals.config()?;
    let store = load_content(&config)?;
    let mut ctx = open_context(&config);
    ctx.require_user()?;

    let topic = store.lookup(key)?;
    if topic.kind() != kind {
        anyhow::bail!(
            "{} is a {}, not a {}; use `prepwise {} {}`",
            topic.key(),
            topic.kind(),
            kind,
            topic.kind(),
            topic.key()
        );
    }

    println!("{}", topic.title());
    if !topic.description().is_empty() {
        println!("{}", topic.description());
    }

    let items = topic.len();
    let mut session = Session::new(topic).with_pass_threshold(config.pass_threshold);
    let reporter = ConsoleReporter {
        kind,
        pass_threshold: config.pass_threshold,
    };

    let outcome = match answers {
        Some(list) => {
            let mut source = ScriptedAnswers::parse_one_based(&list).map_err(anyhow::Error::msg)?;
            if source.remaining() > items {
                anyhow::bail!(
                    "{} answers given but {key} has only {items} items",
                    source.remaining()
                );
            }
            run_session(&mut session, &mut source, &reporter)
        }
        None => {
            let mut source = PromptAnswers {
                input: io::stdin().lock(),
            };
            run_session(&mut session, &mut source, &reporter)
        }
    }
    .context("session failed")?;

    match outcome {
        RunOutcome::Abandoned { answered } => {
            println!("\nSession abandoned after {answered} answer(s); progress discarded.");
        }
        RunOutcome::Completed(report) => {
            if let Some(badge) = ctx.record_attempt(&report)? {
                println!("Badge earned: {badge}");
            }
            if let Some(path) = report_out {
                report.save_json(&path)?;
                println!("Report written to {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item::quiz(1, "Q?", ["a", "b", "c"], 1, "").unwrap()
    }

    #[test]
    fn prompt_answers_skip_invalid_input() {
        let mut source = PromptAnswers {
            input: "x\n9\n 2 \n".as_bytes(),
        };
        assert_eq!(source.next_choice(&item(), 0), Some(1));
        assert_eq!(source.next_choice(&item(), 1), None);
    }

    #[test]
    fn prompt_answers_quit() {
        let mut source = PromptAnswers {
            input: "Q\n1\n".as_bytes(),
        };
        assert_eq!(source.next_choice(&item(), 0), None);
    }
}
