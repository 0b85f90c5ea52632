use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use core_types::Messages;
use forms::FormSubmission;
use markup::MarkupTree;
use persist::{InMemorySessionStore, PersistError, SessionPersistence, StoreOutcome};
use render::{RenderError, RenderQueueError, Scheduler};

mod config;
mod demo;

use config::{AppConfig, ConfigError};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const TRACKER_KEY: &str = "form:signup";

#[derive(Parser)]
#[command(name = "weft")]
#[command(about = "Server-side component rendering and form pipeline demo")]
struct Cli {
    /// Configuration file; defaults are used when it does not exist
    #[arg(long, default_value = "weft.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the sign-up page
    Render,
    /// Submit the sign-up form and print the resulting page
    Submit {
        /// Form values as `name=value`
        values: Vec<String>,
    },
    /// Print the JSON update for the search results zone
    Zone,
    /// Walk through render, failed submit, redisplay and successful submit
    Demo,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Build(#[from] RenderError),
    #[error(transparent)]
    Render(#[from] RenderQueueError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("could not encode zone update: {0}")]
    Json(#[from] serde_json::Error),
    #[error("form value `{0}` is not of the form name=value")]
    BadValue(String),
}

struct App {
    config: AppConfig,
    messages: Arc<dyn Messages>,
    scheduler: Scheduler,
    session: SessionPersistence<InMemorySessionStore>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let messages: Arc<dyn Messages> = Arc::new(config.messages());
        let scheduler = Scheduler::new(config.render_config());
        let session =
            SessionPersistence::new(InMemorySessionStore::new(), config.persist_config());
        Self {
            config,
            messages,
            scheduler,
            session,
        }
    }

    fn markup(&self) -> Result<MarkupTree, AppError> {
        Ok(MarkupTree::new(self.config.markup_config()?))
    }

    /// Renders the sign-up page with whatever tracker the session holds.
    fn get_signup(&self) -> Result<String, AppError> {
        let mut page = demo::signup_page(&self.config, &self.messages)?;
        page.form
            .replace_tracker(self.session.load_or_default(TRACKER_KEY)?);
        let mut markup = self.markup()?;
        self.scheduler.render(&mut page.tree, &mut markup)?;
        let outcome = self
            .session
            .store(TRACKER_KEY, &*page.form.tracker().borrow())?;
        log::debug!("tracker after render: {outcome:?}");
        Ok(markup.serialize())
    }

    /// Processes a post and stores the tracker for the redirect. Returns true when valid.
    fn post_signup(&self, submission: &FormSubmission) -> Result<bool, AppError> {
        let page = demo::signup_page(&self.config, &self.messages)?;
        let valid = page.form.process_submission(submission);
        if valid {
            log::info!(
                "signed up email={:?} age={:?}",
                page.email.get(),
                page.age.get()
            );
        }
        let outcome = self
            .session
            .store(TRACKER_KEY, &*page.form.tracker().borrow())?;
        if outcome == StoreOutcome::SkippedClean {
            log::debug!("tracker unchanged, not stored");
        }
        Ok(valid)
    }

    fn zone_json(&self) -> Result<String, AppError> {
        let (mut tree, zone) = demo::results_page(&self.config)?;
        let update = self
            .scheduler
            .render_partial(&mut tree, zone, "results", self.markup()?)?;
        Ok(update.to_json()?)
    }
}

fn parse_submission(values: &[String]) -> Result<FormSubmission, AppError> {
    values
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| AppError::BadValue(pair.clone()))
        })
        .collect()
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load(&cli.config)?;
    let app = App::new(config);

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Render => println!("{}", app.get_signup()?),
        Commands::Submit { values } => {
            let submission = parse_submission(&values)?;
            let valid = app.post_signup(&submission)?;
            println!("<!-- submission {} -->", if valid { "accepted" } else { "rejected" });
            println!("{}", app.get_signup()?);
        }
        Commands::Zone => println!("{}", app.zone_json()?),
        Commands::Demo => {
            println!("== GET /signup\n{}\n", app.get_signup()?);

            let bad: FormSubmission = [("email", "ab"), ("age", "twelve")].into_iter().collect();
            let valid = app.post_signup(&bad)?;
            println!("== POST /signup (valid: {valid})");
            println!("== GET /signup after redirect\n{}\n", app.get_signup()?);

            let good: FormSubmission =
                [("email", "ada@example.com"), ("age", "36")].into_iter().collect();
            let valid = app.post_signup(&good)?;
            println!("== POST /signup (valid: {valid})");
            println!("== GET /signup after redirect\n{}\n", app.get_signup()?);

            println!("== zone update\n{}", app.zone_json()?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("weft: {err}");
            ExitCode::FAILURE
        }
    }
}
