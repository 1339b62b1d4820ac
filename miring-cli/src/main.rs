use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use miring_core::{
    api::ValidatorClient,
    config::{BASE_URL_ENV, Config, PayloadFormat},
    rules::fetch_rule_table,
    session::{Session, SessionError},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser)]
#[command(name = "miring")]
#[command(about = "Submit HML to a MIRING validator and show the compliance verdict")]
struct Cli {
    /// Origin serving the validator, sample and rules resources
    #[arg(long, env = BASE_URL_ENV, global = true)]
    base_url: Option<String>,
    /// Support address named in failure diagnostics
    #[arg(long, global = true)]
    contact: Option<String>,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SubmitArgs {
    /// Schema version of the document; required, "0" means unselected
    #[arg(long)]
    schema_version: Option<String>,
    /// Form layout: versioned or document-only
    #[arg(long, default_value = "versioned")]
    format: PayloadFormat,
    /// Directory to save MiringResultsReport.xml into
    #[arg(long)]
    download: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a local HML file
    Validate {
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        submit: SubmitArgs,
    },
    /// Validate the sample HML served by the validator
    Sample {
        #[command(flatten)]
        submit: SubmitArgs,
    },
    /// Validate text given with --text or on stdin
    Check {
        #[arg(long)]
        text: Option<String>,
        #[command(flatten)]
        submit: SubmitArgs,
    },
    /// Render the validation rules as an HTML table
    Rules {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut config = match cli.base_url.as_deref() {
        Some(url) => Config::new(url),
        None => Config::default(),
    };
    if let Some(contact) = cli.contact {
        config = config.with_contact(contact);
    }
    debug!(base_url = config.base_url(), "using validator");

    match cli.command {
        Commands::Validate { file, submit } => {
            let client = client_for(config, &submit)?;
            let mut session = Session::new();
            let outcome = session
                .validate_file(&client, &file, submit.schema_version.as_deref())
                .await
                .map(|_| ());
            finish(&session, outcome, &submit)
        }
        Commands::Sample { submit } => {
            let client = client_for(config, &submit)?;
            let mut session = Session::new();
            let outcome = session
                .validate_sample(&client, submit.schema_version.as_deref())
                .await
                .map(|_| ());
            finish(&session, outcome, &submit)
        }
        Commands::Check { text, submit } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("reading document from stdin")?;
                    buffer
                }
            };
            let client = client_for(config, &submit)?;
            let mut session = Session::new();
            session.set_input(text);
            let outcome = session
                .submit(&client, submit.schema_version.as_deref())
                .await
                .map(|_| ());
            finish(&session, outcome, &submit)
        }
        Commands::Rules { output } => {
            let client = ValidatorClient::new(config)?;
            let html = fetch_rule_table(&client)
                .await
                .context("Problem getting Rules.csv from the server")?;
            match output {
                Some(path) => std::fs::write(&path, html)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{html}"),
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn client_for(config: Config, submit: &SubmitArgs) -> Result<ValidatorClient> {
    Ok(ValidatorClient::new(config.with_payload_format(submit.format))?)
}

/// Print whatever the session shows, save the download, then report the outcome.
fn finish(session: &Session, outcome: Result<(), SessionError>, submit: &SubmitArgs) -> Result<()> {
    match &outcome {
        Ok(()) | Err(SessionError::Submission(_)) => {
            if submit.json {
                println!("{}", serde_json::to_string_pretty(&render::json(session))?);
            } else {
                print!("{}", render::text(session));
            }
            if let Some(dir) = submit.download.as_deref() {
                let path = session
                    .download_results()
                    .write_to_dir(dir)
                    .with_context(|| format!("saving results into {}", dir.display()))?;
                eprintln!("saved {}", path.display());
            }
        }
        Err(SessionError::Document(_)) | Err(SessionError::Fetch(_)) => {}
    }
    Ok(outcome?)
}
