//! The `prepwise dashboard` command.

use anyhow::Result;
use chrono::Utc;
use comfy_table::{Cell, Table};

use prepwise_core::statistics::{class_dashboard, student_dashboard};
use prepwise_profile::Role;

use super::{load_content, open_context, Globals};

pub fn execute(globals: &Globals) -> Result<()> {
    let config = globals.config()?;
    let store = load_content(&config)?;
    let ctx = open_context(&config);
    let user = ctx.require_user()?;
    let attempts = ctx.attempts()?;

    match user.role {
        Role::Student => {
            let dash = student_dashboard(&user.identity_key(), &attempts, &store);
            println!("Welcome back, {}!", user.name);
            println!(
                "Points: {}  Level: {}  Completed: {}/{}  Average: {}",
                dash.progress.points,
                dash.progress.level,
                dash.topics_completed,
                dash.total_topics,
                dash.average_percentage
                    .map_or_else(|| "-".to_string(), |p| format!("{p}%"))
            );

            let mut table = Table::new();
            table.set_header(vec!["Topic", "Attempts", "Best", "Status"]);
            for topic in &dash.topics {
                table.add_row(vec![
                    Cell::new(&topic.topic_title),
                    Cell::new(topic.attempts),
                    Cell::new(
                        topic
                            .best_percentage
                            .map_or_else(|| "-".to_string(), |p| format!("{p}%")),
                    ),
                    Cell::new(match (topic.completed, topic.attempts) {
                        (true, _) => "completed",
                        (false, 0) => "not started",
                        (false, _) => "in progress",
                    }),
                ]);
            }
            println!("\n{table}");

            if dash.progress.badges.is_empty() {
                println!("Badges: none yet");
            } else {
                println!("Badges: {}", dash.progress.badges.join(", "));
            }
        }
        Role::Teacher => {
            let dash = class_dashboard(&attempts, &store, Utc::now());
            println!("Class overview");
            println!(
                "Students: {}  Active today: {}  Average score: {}  Completion: {}%",
                dash.total_students,
                dash.active_today,
                dash.average_score
                    .map_or_else(|| "-".to_string(), |p| format!("{p}%")),
                dash.completion_rate
            );

            let mut modules = Table::new();
            modules.set_header(vec!["Module", "Completed", "Completion"]);
            for m in &dash.modules {
                modules.add_row(vec![
                    Cell::new(&m.topic_title),
                    Cell::new(format!("{}/{}", m.completed, m.total)),
                    Cell::new(format!("{}%", m.percentage)),
                ]);
            }
            println!("\n{modules}");

            if !dash.top_performers.is_empty() {
                let mut top = Table::new();
                top.set_header(vec!["Student", "Points", "Level", "Badges"]);
                for p in &dash.top_performers {
                    top.add_row(vec![
                        Cell::new(&p.name),
                        Cell::new(p.points),
                        Cell::new(p.level),
                        Cell::new(p.badges),
                    ]);
                }
                println!("\nTop performers\n{top}");
            }

            if !dash.recent_activity.is_empty() {
                println!("\nRecent activity");
                for a in &dash.recent_activity {
                    println!("  {} - {} ({}%) {}", a.student, a.action, a.percentage, a.when);
                }
            }
        }
    }

    Ok(())
}
