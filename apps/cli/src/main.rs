use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpTransport, ReviewWorkflow};
use shared::protocol::{AnalysisResult, Review, ReviewListResponse};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use render::Renderer;

#[derive(Parser, Debug)]
#[command(
    name = "review-cli",
    version,
    about = "Submit product reviews for sentiment analysis and browse the analysis history"
)]
struct Args {
    /// Base URL of the review analysis API
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Print raw JSON instead of rendered text
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored sentiment badges
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one review, then show the refreshed history
    Analyze {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show the analysis history
    History,
    /// Read reviews from stdin, one per line
    Interactive,
}

struct Output {
    renderer: Renderer,
    json: bool,
}

impl Output {
    fn lines(&self, lines: Vec<String>) {
        for line in lines {
            println!("{line}");
        }
    }

    fn analysis(&self, result: &AnalysisResult) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else {
            self.lines(self.renderer.analysis(result));
        }
        Ok(())
    }

    fn history(&self, reviews: &[Review]) -> Result<()> {
        if self.json {
            let list = ReviewListResponse {
                reviews: reviews.to_vec(),
            };
            println!("{}", serde_json::to_string_pretty(&list)?);
        } else {
            self.lines(self.renderer.history(reviews));
        }
        Ok(())
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.renderer.error(message));
    }

    fn status(&self, workflow: &ReviewWorkflow) {
        if self.json {
            return;
        }
        if let Some(line) = self.renderer.submit_status(&workflow.snapshot()) {
            eprintln!("{line}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = config::load_settings(&args.config, args.api_base_url.as_deref())?;
    info!(api_base_url = %settings.api_base_url, "starting review client");

    let workflow = ReviewWorkflow::new(Arc::new(HttpTransport::new(settings.api_base_url)));
    let output = Output {
        renderer: Renderer::new(!args.no_color),
        json: args.json,
    };

    match args.command.unwrap_or(Command::Interactive) {
        Command::Analyze { text } => analyze(&workflow, &output, text.join(" ")).await,
        Command::History => history(&workflow, &output).await,
        Command::Interactive => interactive(&workflow, &output).await,
    }
}

async fn analyze(workflow: &ReviewWorkflow, output: &Output, text: String) -> Result<()> {
    workflow.set_draft(text);
    output.status(workflow);
    match workflow.submit_draft().await {
        Ok(result) => {
            output.analysis(&result)?;
            output.history(&workflow.snapshot().history)
        }
        Err(err) => {
            let message = workflow
                .snapshot()
                .error_message
                .unwrap_or_else(|| err.user_message());
            Err(anyhow!(message).context("review analysis failed"))
        }
    }
}

async fn history(workflow: &ReviewWorkflow, output: &Output) -> Result<()> {
    let reviews = workflow
        .load()
        .await
        .context("failed to fetch review history")?;
    output.history(&reviews)
}

async fn interactive(workflow: &ReviewWorkflow, output: &Output) -> Result<()> {
    if let Err(err) = workflow.load().await {
        debug!(error = %err, "initial history load failed");
    }
    output.history(&workflow.snapshot().history)?;
    eprintln!("Type a review and press Enter. Commands: :refresh, :history, :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read from stdin")?
    {
        match line.trim() {
            ":quit" | ":q" => break,
            ":refresh" => {
                if let Err(err) = workflow.refresh_history().await {
                    debug!(error = %err, "history refresh failed");
                }
                output.history(&workflow.snapshot().history)?;
            }
            ":history" => output.history(&workflow.snapshot().history)?,
            _ => {
                workflow.set_draft(line.clone());
                output.status(workflow);
                match workflow.submit_draft().await {
                    Ok(result) => {
                        output.analysis(&result)?;
                        output.history(&workflow.snapshot().history)?;
                    }
                    Err(err) => {
                        let message = workflow
                            .snapshot()
                            .error_message
                            .unwrap_or_else(|| err.user_message());
                        output.error(&message);
                    }
                }
            }
        }
    }

    Ok(())
}
