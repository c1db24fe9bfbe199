//! The `prepwise topics` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use prepwise_core::TopicKind;

use super::{load_content, Globals};

pub fn execute(globals: &Globals, kind: Option<TopicKind>) -> Result<()> {
    let config = globals.config()?;
    let store = load_content(&config)?;

    let mut table = Table::new();
    table.set_header(vec!["Key", "Title", "Kind", "Items", "Description"]);

    let mut shown = 0;
    for topic in store.topics().filter(|t| kind.map_or(true, |k| t.kind() == k)) {
        table.add_row(vec![
            Cell::new(topic.key()),
            Cell::new(topic.title()),
            Cell::new(topic.kind()),
            Cell::new(topic.len()),
            Cell::new(topic.description()),
        ]);
        shown += 1;
    }

    println!("{table}");
    println!("{shown} topic(s)");
    Ok(())
}
