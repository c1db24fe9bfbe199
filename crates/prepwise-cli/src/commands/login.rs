//! The `prepwise login`, `logout`, and `whoami` commands.

use anyhow::Result;

use prepwise_profile::Role;

use super::{open_context, Globals};

pub fn execute(globals: &Globals, email: &str, password: &str, role: Role) -> Result<()> {
    let config = globals.config()?;
    let mut ctx = open_context(&config);
    let user = ctx.login(email, password, role)?;
    println!("Logged in as {} ({})", user.name, user.role);
    Ok(())
}

pub fn logout(globals: &Globals) -> Result<()> {
    let config = globals.config()?;
    let mut ctx = open_context(&config);
    let was_logged_in = ctx.user().is_some();
    ctx.logout()?;
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(globals: &Globals) -> Result<()> {
    let config = globals.config()?;
    let ctx = open_context(&config);
    let Some(user) = ctx.user() else {
        println!("Not logged in.");
        return Ok(());
    };

    println!("{} <{}> ({})", user.name, user.email, user.role);
    if let Some(progress) = ctx.progress()? {
        println!("Points: {}  Level: {}", progress.points, progress.level);
        if progress.badges.is_empty() {
            println!("Badges: none yet");
        } else {
            println!("Badges: {}", progress.badges.join(", "));
        }
    }
    Ok(())
}
