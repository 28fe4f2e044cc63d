//! lexrag command-line interface
//!
//! Owns everything the QA core deliberately does not: credential
//! acquisition, the session transcript, and re-ingestion triggers.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lexrag::{AnswerRecord, QaEngine, QaSession, RagConfig};

#[derive(Parser)]
#[command(name = "lexrag", version, about = "Question answering over a statute PDF corpus")]
struct Cli {
    /// Directory holding the source documents
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory the vector index is persisted to
    #[arg(long, default_value = "lexrag_index")]
    index_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest the corpus into the vector index (no-op if already built)
    Ingest {
        /// Rebuild even when a persisted index exists
        #[arg(long)]
        force: bool,
    },
    /// Ask a single question
    Ask {
        /// The question to answer
        question: String,
    },
    /// Interactive question-answering session
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY is not set; the QA core needs it for remote model calls")?;

    let mut config = RagConfig::default();
    config.corpus.data_dir = cli.data_dir;
    config.index.index_dir = cli.index_dir;

    match cli.command {
        Command::Ingest { force } => {
            let engine = QaEngine::initialize(&config, &api_key, force).await?;
            println!("Index ready: {} passages.", engine.index_size());
        }
        Command::Ask { question } => {
            let engine = QaEngine::initialize(&config, &api_key, false).await?;
            let record = engine.answer_question(&question).await;
            print_record(&record);
        }
        Command::Chat => {
            let engine = QaEngine::initialize(&config, &api_key, false).await?;
            run_chat(&engine).await?;
        }
    }

    Ok(())
}

fn print_record(record: &AnswerRecord) {
    println!("\n{}", record.answer);
    if !record.sources.is_empty() {
        println!("\nSources:\n{}", record.sources);
    }
}

async fn run_chat(engine: &QaEngine) -> anyhow::Result<()> {
    let mut session = QaSession::new();
    println!("Ask a question about the corpus. :clear resets the transcript, :quit exits.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            ":quit" | ":q" => break,
            ":clear" => {
                session.clear();
                println!("Transcript cleared.");
            }
            _ => {
                let record = engine.answer_question(input).await;
                print_record(&record);
                if !input.is_empty() {
                    session.push(record);
                    println!("\n({} questions this session)", session.len());
                }
            }
        }
    }

    Ok(())
}
