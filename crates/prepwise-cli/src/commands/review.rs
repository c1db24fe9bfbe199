//! The `prepwise review` command.

use std::path::PathBuf;

use anyhow::Result;

use prepwise_core::SessionReport;

pub fn execute(path: PathBuf) -> Result<()> {
    let report = SessionReport::load_json(&path)?;

    println!(
        "{} ({}): {}/{} correct, {}%{}",
        report.topic_title,
        report.kind,
        report.score,
        report.total,
        report.percentage,
        if report.passed { " - passed" } else { "" }
    );
    println!(
        "Completed {}",
        report.completed_at.format("%Y-%m-%d %H:%M UTC")
    );

    for (n, answer) in report.answers.iter().enumerate() {
        let mark = if answer.correct { "correct" } else { "wrong" };
        println!("\n{}. [{mark}] {}", n + 1, answer.prompt);

        let picked = answer
            .selected
            .and_then(|i| answer.choices.get(i))
            .map_or("(no answer)", String::as_str);
        println!("   Your answer: {picked}");
        if !answer.correct {
            if let Some(right) = answer.choices.get(answer.correct_choice) {
                println!("   Correct answer: {right}");
            }
        }
        if let Some(feedback) = &answer.feedback {
            println!("   {feedback}");
        }
        if !answer.explanation.is_empty() {
            println!("   {}", answer.explanation);
        }
    }

    Ok(())
}
