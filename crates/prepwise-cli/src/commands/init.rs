//! The `prepwise init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("prepwise.toml").exists() {
        println!("prepwise.toml already exists, skipping.");
    } else {
        std::fs::write("prepwise.toml", SAMPLE_CONFIG)?;
        println!("Created prepwise.toml");
    }

    std::fs::create_dir_all("content")?;
    let example_path = Path::new("content/example.toml");
    if example_path.exists() {
        println!("content/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_PACK)?;
        println!("Created content/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: prepwise validate --content content/example.toml");
    println!("  2. Run: prepwise login --email you@school.edu --password secret");
    println!("  3. Run: prepwise quiz earthquake-basics");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# prepwise configuration

# Profile and attempt history.
data_dir = "./.prepwise"

# Extra quizzes and drills, loaded on top of the built-in ones.
content_dir = "./content"

# Percentage needed to pass a quiz or be certified on a drill.
pass_threshold = 80

# Serve this topic when an unknown key is requested instead of failing.
# fallback_topic = "fire-safety"
"#;

const EXAMPLE_PACK: &str = r#"[topic]
key = "earthquake-basics"
title = "Earthquake Basics"
kind = "quiz"
description = "What to do before, during, and after shaking"

[[items]]
id = 1
prompt = "When the ground starts shaking indoors, you should:"
choices = [
    "Run outside immediately",
    "Drop, cover, and hold on",
    "Stand in a doorway",
    "Take the elevator down",
]
correct = 1
explanation = "Dropping under sturdy furniture and holding on protects you from falling objects."

[[items]]
id = 2
prompt = "After the shaking stops, what should you check first?"
choices = [
    "Yourself and others for injuries",
    "Your phone for messages",
    "The news",
    "Whether school is cancelled",
]
correct = 0
explanation = "Treat injuries before anything else, then check for hazards like gas leaks."
"#;
