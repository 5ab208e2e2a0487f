use std::fs;
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use quill_engine::api::QuillSession;
use quill_engine::client::{needs_request, HttpPredictionService, PredictionService};
use quill_engine::replay::{load_script, run_script, ScriptStep};
use quill_engine::settings;

#[derive(Parser)]
#[command(name = "quilltool", about = "Predictive text engine diagnostics")]
struct Cli {
    /// Settings TOML to use instead of the built-in defaults
    #[arg(long, global = true)]
    config: Option<String>,

    /// Write JSON traces into this directory (needs the `trace` feature)
    #[arg(long, global = true)]
    trace_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request predictions for a piece of text once
    Predict {
        /// Document text; quote it to keep trailing spaces
        text: String,
        /// Prediction endpoint (defaults to the configured one)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Replay a script of edits and keys against a live session
    Replay {
        /// Path to the script file
        script: String,
        /// Prediction endpoint (defaults to the configured one)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Print the default settings TOML
    Config,
}

/// One `predict` result.
#[derive(Debug, Serialize)]
struct PredictOutput<'a> {
    text: &'a str,
    requested: bool,
    predictions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// One line of `replay` output.
#[derive(Debug, Serialize)]
struct ReplayLine<'a> {
    step: String,
    #[serde(flatten)]
    snapshot: &'a quill_engine::api::QuillSnapshot,
}

fn load_config(path: &str) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read config {}: {}", path, e);
        process::exit(1);
    });
    if let Err(e) = settings::init_custom(content) {
        eprintln!("Invalid config {}: {}", path, e);
        process::exit(1);
    }
}

fn describe(step: &ScriptStep) -> String {
    match step {
        ScriptStep::Type(text) => format!("type {text:?}"),
        ScriptStep::Set(text) => format!("set {text:?}"),
        ScriptStep::Tab => "tab".to_string(),
        ScriptStep::Enter => "enter".to_string(),
        ScriptStep::Choose(i) => format!("choose {i}"),
        ScriptStep::Wait(d) => format!("wait {}", d.as_millis()),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config {
        load_config(path);
    }
    if let Some(ref dir) = cli.trace_dir {
        quill_engine::trace_init::init_tracing(Path::new(dir));
    }

    match cli.command {
        Command::Predict { text, endpoint } => {
            let endpoint =
                endpoint.unwrap_or_else(|| settings::settings().prediction.endpoint.clone());
            let service =
                HttpPredictionService::with_timeout(endpoint, settings::settings().request_timeout());

            // Unlike the session, surface the error instead of swallowing it
            let requested = needs_request(&text);
            let (predictions, error) = if requested {
                match service.predict(&text) {
                    Ok(p) => (p, None),
                    Err(e) => (Vec::new(), Some(e.to_string())),
                }
            } else {
                (Vec::new(), None)
            };

            let output = PredictOutput {
                text: &text,
                requested,
                predictions,
                error,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).expect("JSON serialization failed")
            );
            if output.error.is_some() {
                process::exit(2);
            }
        }

        Command::Replay { script, endpoint } => {
            let steps = load_script(Path::new(&script)).unwrap_or_else(|e| {
                eprintln!("Failed to load script: {}", e);
                process::exit(1);
            });
            let session = QuillSession::new(endpoint);

            run_script(&session, &steps, |step, snapshot| {
                let line = ReplayLine {
                    step: describe(step),
                    snapshot,
                };
                println!(
                    "{}",
                    serde_json::to_string(&line).expect("JSON serialization failed")
                );
            });
            session.teardown();
        }

        Command::Config => {
            print!("{}", settings::default_toml());
        }
    }
}
