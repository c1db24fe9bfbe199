//! The `prepwise validate` command.

use std::path::PathBuf;

use anyhow::Result;

use prepwise_core::parser;

pub fn execute(content_path: PathBuf) -> Result<()> {
    let topics = if content_path.is_dir() {
        parser::load_content_dir(&content_path)?
    } else {
        vec![parser::parse_topic_file(&content_path)?]
    };

    let mut total_warnings = 0;

    for topic in &topics {
        println!(
            "{}: {} ({}, {} items)",
            topic.key(),
            topic.title(),
            topic.kind(),
            topic.len()
        );

        let warnings = parser::validate_topic(topic);
        for w in &warnings {
            let prefix = w
                .item_id
                .map(|id| format!("  [item {id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All content packs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
