//! `boundary`: extract decisions from a conversation, review them, and
//! export an accountable decision log.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use boundary_ai::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use boundary_ai::{Analyzer, ExtractionClient, ExtractionConfig};
use boundary_core::{DecisionAnalysis, EmailMetadata, ReviewSession};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

mod display;
mod review;

#[derive(Parser)]
#[command(name = "boundary")]
#[command(about = "Decision extraction with a human approval boundary", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    extraction: ExtractionArgs,

    /// Log pipeline detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract decisions and print a summary
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Conservative analysis for regulated or client-impacting content
        #[arg(long)]
        high_stakes: bool,

        /// Print the analysis as JSON instead of the summary card
        #[arg(long)]
        json: bool,
    },

    /// Extract decisions, approve them one by one, then export the decision log
    Review {
        #[command(flatten)]
        input: InputArgs,

        /// Conservative analysis for regulated or client-impacting content
        #[arg(long)]
        high_stakes: bool,

        /// Where to write the decision log
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// File containing the conversation
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Conversation text
    #[arg(long)]
    text: Option<String>,
}

impl InputArgs {
    fn read(&self) -> anyhow::Result<String> {
        let transcript = match (&self.file, &self.text) {
            (Some(path), _) => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
            (None, Some(text)) => text.clone(),
            (None, None) => bail!("no conversation given, use --file or --text"),
        };
        if transcript.trim().is_empty() {
            bail!("conversation is empty");
        }
        Ok(transcript)
    }
}

#[derive(Args)]
struct ExtractionArgs {
    /// API key for the chat completions endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Model name
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Endpoint root, e.g. https://api.openai.com/v1
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "BOUNDARY_TIMEOUT_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    timeout_secs: u64,
}

impl ExtractionArgs {
    fn into_config(self) -> ExtractionConfig {
        ExtractionConfig {
            api_key: self.api_key,
            model: self.model,
            base_url: self.base_url,
            timeout: Duration::from_secs(self.timeout_secs),
            ..ExtractionConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads env fallbacks.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();
    tracing::debug!("boundary v{}", env!("CARGO_PKG_VERSION"));

    let analyzer = Analyzer::new(ExtractionClient::from_config(cli.extraction.into_config()));

    match cli.command {
        Commands::Analyze {
            input,
            high_stakes,
            json,
        } => {
            let transcript = input.read()?;
            let analysis = analyzer.analyze(&transcript, high_stakes).await;
            print_analysis(
                &mut io::stdout().lock(),
                &analysis,
                &transcript,
                high_stakes,
                json,
            )
        }
        Commands::Review {
            input,
            high_stakes,
            output,
        } => {
            let transcript = input.read()?;
            let analysis = analyzer.analyze(&transcript, high_stakes).await;
            print_summary(&mut io::stdout().lock(), &analysis, &transcript, high_stakes)?;

            let mut session = ReviewSession::new(analysis);
            {
                let mut prompter = review::Prompter::new(io::stdin().lock(), io::stdout().lock());
                review::run_review(&mut session, &mut prompter)?;
            }

            let path = output.unwrap_or_else(|| review::default_output_path(chrono::Local::now()));
            review::export_log(&session, &path)?;
            println!("Decision log exported to {}", path.display());
            Ok(())
        }
    }
}

fn print_analysis(
    out: &mut impl Write,
    analysis: &DecisionAnalysis,
    transcript: &str,
    high_stakes: bool,
    json: bool,
) -> anyhow::Result<()> {
    if !json {
        return print_summary(out, analysis, transcript, high_stakes);
    }
    let json = analysis
        .to_json_pretty()
        .context("serialising analysis")?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn print_summary(
    out: &mut impl Write,
    analysis: &DecisionAnalysis,
    transcript: &str,
    high_stakes: bool,
) -> anyhow::Result<()> {
    let meta = EmailMetadata::parse(transcript);
    display::write_summary(out, analysis, &meta, high_stakes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn input_is_file_or_text_not_both() {
        assert!(Cli::try_parse_from(["boundary", "analyze"]).is_err());
        assert!(
            Cli::try_parse_from(["boundary", "analyze", "--text", "a", "--file", "b.txt"]).is_err()
        );
        let cli = Cli::try_parse_from(["boundary", "analyze", "--text", "hello", "--json"]).unwrap();
        match cli.command {
            Commands::Analyze { input, json, .. } => {
                assert!(json);
                assert_eq!(input.read().unwrap(), "hello");
            }
            Commands::Review { .. } => panic!("expected analyze"),
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        let input = InputArgs {
            file: None,
            text: Some("  \n ".into()),
        };
        assert!(input.read().is_err());
    }

    #[test]
    fn file_input_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thread.txt");
        std::fs::write(&path, "From: A\n\nLet's ship it.").unwrap();
        let input = InputArgs {
            file: Some(path),
            text: None,
        };
        assert_eq!(input.read().unwrap(), "From: A\n\nLet's ship it.");
    }

    #[test]
    fn extraction_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "boundary",
            "review",
            "--text",
            "x",
            "--api-key",
            "sk-test",
            "--model",
            "gpt-4o",
            "--timeout-secs",
            "5",
            "--output",
            "out.md",
        ])
        .unwrap();
        let config = cli.extraction.into_config();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(5));
        match cli.command {
            Commands::Review { output, .. } => assert_eq!(output, Some(PathBuf::from("out.md"))),
            Commands::Analyze { .. } => panic!("expected review"),
        }
    }

    #[test]
    fn largest_timeout_builds_analyzer() {
        let cli = Cli::try_parse_from([
            "boundary",
            "analyze",
            "--text",
            "x",
            "--api-key",
            "k",
            "--timeout-secs",
            "18446744073709551615",
        ])
        .unwrap();
        let config = cli.extraction.into_config();
        assert_eq!(config.timeout, Duration::from_secs(u64::MAX));
        let _ = Analyzer::new(ExtractionClient::from_config(config));
    }

    #[test]
    fn json_output_is_the_analysis() {
        let analysis = boundary_core::fallback_analysis(
            boundary_core::FailureClass::Configuration,
            "no key",
        );
        let mut out = Vec::new();
        print_analysis(&mut out, &analysis, "From: A\n\nhi", false, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("{}\n", analysis.to_json_pretty().unwrap()));
        assert!(text.contains("\"humanMustDecide\""));

        let mut out = Vec::new();
        print_analysis(&mut out, &analysis, "Subject: Rollout\n", false, false).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("=== Rollout ===\n"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(
            Cli::try_parse_from(["boundary", "analyze", "--text", "x", "--timeout-secs", "0"])
                .is_err()
        );
    }
}
