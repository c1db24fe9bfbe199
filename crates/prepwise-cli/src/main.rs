//! prepwise CLI: quizzes, drills, and dashboards in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use prepwise_core::TopicKind;
use prepwise_profile::Role;

mod commands;

#[derive(Parser)]
#[command(
    name = "prepwise",
    version,
    about = "Disaster-preparedness quizzes and drills"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the profile and attempt history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in (any non-blank email and password)
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// student or teacher
        #[arg(long, default_value = "student")]
        role: Role,
    },

    /// Log out and forget the saved profile
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List available quizzes and drills
    Topics {
        /// Only list one kind: quiz or drill
        #[arg(long)]
        kind: Option<TopicKind>,
    },

    /// Take a quiz
    Quiz {
        /// Topic key, e.g. fire-safety
        topic: String,

        /// Pre-selected answers, 1-based and comma-separated (e.g. "2,1,3")
        #[arg(long)]
        answers: Option<String>,

        /// Write the session report as JSON
        #[arg(long)]
        report_out: Option<PathBuf>,
    },

    /// Run a drill scenario
    Drill {
        /// Scenario key, e.g. fire-drill
        scenario: String,

        /// Pre-selected answers, 1-based and comma-separated (e.g. "2,2,1")
        #[arg(long)]
        answers: Option<String>,

        /// Write the session report as JSON
        #[arg(long)]
        report_out: Option<PathBuf>,
    },

    /// Review the answers in a saved session report
    Review {
        /// Report JSON written with --report-out
        report: PathBuf,
    },

    /// Show the student or teacher dashboard
    Dashboard,

    /// Validate content-pack TOML files
    Validate {
        /// Path to a content pack file or directory
        #[arg(long)]
        content: PathBuf,
    },

    /// Create starter config and example content pack
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prepwise=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let globals = commands::Globals {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Login {
            email,
            password,
            role,
        } => commands::login::execute(&globals, &email, &password, role),
        Commands::Logout => commands::login::logout(&globals),
        Commands::Whoami => commands::login::whoami(&globals),
        Commands::Topics { kind } => commands::topics::execute(&globals, kind),
        Commands::Quiz {
            topic,
            answers,
            report_out,
        } => commands::run::execute(&globals, TopicKind::Quiz, &topic, answers, report_out),
        Commands::Drill {
            scenario,
            answers,
            report_out,
        } => commands::run::execute(&globals, TopicKind::Drill, &scenario, answers, report_out),
        Commands::Review { report } => commands::review::execute(report),
        Commands::Dashboard => commands::dashboard::execute(&globals),
        Commands::Validate { content } => commands::validate::execute(content),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
