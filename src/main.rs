use std::io::{IsTerminal, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mastery_report::api::{ApiError, PlatformClient, SessionCookie, StudentId};
use mastery_report::curriculum::ChapterId;
use mastery_report::mastery::{run_chapter, run_walk};
use mastery_report::report::{self, RenderOptions};
use mastery_report::{Config, CurriculumIndex, Theme};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mastery-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report lessons below mastery (default)
    Report(ReportArgs),
    /// Store the platform session cookie in the system keyring
    Login {
        /// Cookie header value copied from the browser, e.g. "session=..."
        cookie: String,
    },
    /// Remove the stored session cookie
    Logout,
    /// Show or update the configuration
    Config(ConfigArgs),
}

#[derive(Args, Default)]
struct ReportArgs {
    /// Report a single chapter instead of walking the curriculum
    #[arg(short, long)]
    chapter: Option<ChapterId>,
    /// Include mastered lessons
    #[arg(short, long)]
    all: bool,
    /// Mastery threshold for this run (0-1)
    #[arg(long)]
    threshold: Option<f64>,
    /// Completed attempts needed for mastery in this run
    #[arg(long)]
    min_attempts: Option<usize>,
    /// Disable colours
    #[arg(long)]
    no_color: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Student whose progress is reported
    #[arg(long)]
    student_id: Option<StudentId>,
    /// Default mastery threshold (0-1)
    #[arg(long)]
    threshold: Option<f64>,
    /// Default number of completed attempts needed for mastery
    #[arg(long)]
    min_attempts: Option<usize>,
    /// Platform base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr, the report to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mastery_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Report(args)) => report_command(args),
        None => report_command(ReportArgs::default()),
        Some(Commands::Login { cookie }) => {
            SessionCookie::set(&cookie)?;
            println!("Stored session cookie {}", SessionCookie::mask(&cookie));
            Ok(())
        }
        Some(Commands::Logout) => {
            SessionCookie::delete()?;
            println!("Removed session cookie");
            Ok(())
        }
        Some(Commands::Config(args)) => config_command(args),
    }
}

fn report_command(args: ReportArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(threshold) = args.threshold {
        config.mastery_threshold = threshold;
    }
    if let Some(min_attempts) = args.min_attempts {
        config.min_attempts = min_attempts;
    }
    config.validate()?;

    let student_id = config.student_id.ok_or(ApiError::StudentNotConfigured)?;
    let cookie = SessionCookie::get()?;
    let client = PlatformClient::new(&config.base_url, cookie, student_id, config.timeout())?;

    let curriculum = CurriculumIndex::builtin();
    let policy = config.policy();
    let theme = Theme::default();
    let options = RenderOptions {
        include_mastered: args.all,
        color: !args.no_color && std::io::stdout().is_terminal(),
    };

    let result = match args.chapter {
        Some(chapter) => run_chapter(&client, &curriculum, chapter, student_id, &policy),
        None => run_walk(&client, &curriculum, student_id, &policy).map(Some),
    };

    let run = match result {
        Ok(Some(run)) => run,
        Ok(None) => {
            println!("Chapter has not been started");
            return Ok(());
        }
        // The platform refused the session: no partial report
        Err(err) if err.is_fatal() => {
            let stderr_color = !args.no_color && std::io::stderr().is_terminal();
            let options = RenderOptions { color: stderr_color, ..options };
            report::render_error(&mut std::io::stderr().lock(), &err, options, &theme)?;
            std::process::exit(1);
        }
        Err(err) => return Err(err).context("Failed to collect chapter reports"),
    };

    let mut out = std::io::stdout().lock();
    report::render(&mut out, &curriculum, &run, options, &theme)?;
    report::render_summary(&mut out, &curriculum, &run, args.chapter, options, &theme)?;
    out.flush()?;

    Ok(())
}

fn config_command(args: ConfigArgs) -> Result<()> {
    let mut config = Config::load()?;
    let mut changed = false;

    if let Some(student_id) = args.student_id {
        config.student_id = Some(student_id);
        changed = true;
    }
    if let Some(threshold) = args.threshold {
        config.mastery_threshold = threshold;
        changed = true;
    }
    if let Some(min_attempts) = args.min_attempts {
        config.min_attempts = min_attempts;
        changed = true;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
        changed = true;
    }

    if changed {
        config.validate()?;
        config.save()?;
    }

    println!("{}", Config::config_path()?.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
