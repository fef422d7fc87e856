//! Terminal front-end for the virtual doctor.
//!
//! Reads one message per line from stdin and prints each reply on stdout.

use std::panic;
use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use virtual_doctor::logging::{LogLevel, init_logging, init_logging_with_filter};
use virtual_doctor::{
    ChatMessage, DoctorConfig, GeminiModel, IntakeSession, LLMClient, MockClient, load_report,
};

#[derive(Parser, Debug)]
#[command(name = "virtual-doctor", version, about = "Virtual Doctor, your AI health companion")]
struct Args {
    /// Medical report to summarize before the conversation (.pdf or .txt)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Gemini model name, overrides VIRTUAL_DOCTOR_MODEL
    #[arg(short, long)]
    model: Option<String>,

    /// Use the offline mock model instead of Gemini
    #[arg(long)]
    mock: bool,

    /// Seed for the follow-up question order
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: LogLevel,

    /// Full tracing filter, e.g. "virtual_doctor=debug"; overrides --log-level
    #[arg(long)]
    log_filter: Option<String>,
}

fn build_client(args: &Args) -> virtual_doctor::Result<Box<dyn LLMClient>> {
    if args.mock {
        return Ok(Box::new(MockClient::new()));
    }

    let mut config = DoctorConfig::from_env()?;
    if let Some(model) = &args.model {
        config.model = GeminiModel::from_string(model.as_str());
    }
    Ok(Box::new(config.gemini_client()?))
}

/// Load a report without the default panic hook writing to the terminal.
fn load_report_quietly(path: &Path) -> virtual_doctor::Result<String> {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let loaded = load_report(path);
    panic::set_hook(hook);
    loaded
}

fn show(transcript: &mut Vec<ChatMessage>, text: String) {
    println!("\n{}\n", text);
    transcript.push(ChatMessage::assistant(text));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    match &args.log_filter {
        Some(filter) => init_logging_with_filter(filter),
        None => init_logging(args.log_level),
    }

    let mut session = IntakeSession::from_boxed(build_client(&args)?);
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }
    let mut transcript: Vec<ChatMessage> = Vec::new();

    let greeting = session.initialize();
    match &args.report {
        Some(path) => match load_report_quietly(path) {
            Ok(text) => {
                let reply = session.process_report(&text).await;
                show(&mut transcript, reply.render());
            }
            Err(e) => {
                eprintln!("Error processing file: {}", e);
                show(&mut transcript, greeting.to_string());
            }
        },
        None => show(&mut transcript, greeting.to_string()),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        transcript.push(ChatMessage::user(input));
        let reply = session.record_turn(input, &transcript).await;
        show(&mut transcript, reply.render());
    }

    Ok(())
}
