//! # ManualBot — WhatsApp Manual Assistant
//!
//! Answers questions over WhatsApp, grounded strictly in a folder of PDF
//! manuals. At startup the manuals are ingested into one knowledge context;
//! each `!ask <question>` message is answered by Gemini with that context as
//! the system instruction.
//!
//! Usage:
//!   manualbot run              # Start the assistant (webhook gateway + channel)
//!   manualbot ingest           # Run the ingestion pass once and print a summary
//!   manualbot ask "question"   # Answer one question on stdout, no channel

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use manualbot_agent::{AnswerGenerator, Assistant, CommandDispatcher};
use manualbot_channels::WhatsAppChannel;
use manualbot_core::error::ManualBotError;
use manualbot_core::traits::{Channel, Provider};
use manualbot_core::ManualBotConfig;
use manualbot_knowledge::{KnowledgeIngestor, KnowledgeStore, PdfExtractor};

#[derive(Parser)]
#[command(
    name = "manualbot",
    version,
    about = "📚 ManualBot — WhatsApp assistant grounded in your PDF manuals"
)]
struct Cli {
    /// Path to the config file (default: ~/.manualbot/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the assistant service
    Run,
    /// Run the ingestion pass once and print a summary
    Ingest,
    /// Answer a single question from the command line
    Ask {
        /// The question to answer
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "manualbot=debug,tower_http=debug"
    } else {
        "manualbot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => ManualBotConfig::load_from(path)?,
        None => ManualBotConfig::load()?,
    };

    let command = cli.command.unwrap_or(Command::Run);

    // Fatal startup precondition: answering requires the Gemini API key.
    if matches!(command, Command::Run | Command::Ask { .. }) && config.resolve_api_key().is_none() {
        tracing::error!("FATAL: {}", ManualBotError::ApiKeyMissing);
        std::process::exit(1);
    }

    match command {
        Command::Run => run(config).await,
        Command::Ingest => ingest(config).await,
        Command::Ask { question } => ask(config, question.join(" ")).await,
    }
}

/// Full service: channel + webhook gateway + assistant event loop.
async fn run(config: ManualBotConfig) -> Result<()> {
    tracing::info!("Starting ManualBot...");

    let store = Arc::new(KnowledgeStore::new());
    let provider: Arc<dyn Provider> = Arc::from(manualbot_providers::create_provider(&config)?);
    let generator = AnswerGenerator::new(Arc::clone(&store), provider);
    let ingestor = KnowledgeIngestor::new(Box::new(PdfExtractor::new()));

    let mut channel = WhatsAppChannel::new(config.whatsapp.clone());
    // Auth trouble is advisory: the gateway keeps serving and the operator
    // fixes credentials, but no Ready fires so the store stays unloaded.
    if let Err(e) = channel.connect().await {
        tracing::error!("WhatsApp connection failed: {e}");
    }
    let events = channel.listen().await?;
    let channel = Arc::new(channel);

    let state = manualbot_gateway::AppState::new(Arc::clone(&channel));
    let gateway = config.gateway.clone();
    tokio::spawn(async move {
        if let Err(e) = manualbot_gateway::serve(&gateway.host, gateway.port, state).await {
            tracing::error!("Gateway terminated: {e}");
        }
    });

    let assistant = Arc::new(Assistant::new(
        CommandDispatcher::new(config.command_prefix.clone()),
        generator,
        ingestor,
        Arc::clone(&store),
        config.docs_path(),
        channel as Arc<dyn Channel>,
    ));
    assistant.run(events).await;
    Ok(())
}

/// One ingestion pass, summary on stdout.
async fn ingest(config: ManualBotConfig) -> Result<()> {
    let ingestor = KnowledgeIngestor::new(Box::new(PdfExtractor::new()));
    let context = ingestor.ingest(&config.docs_path()).await;
    println!("Documents ingested: {}", context.document_count());
    println!("Context size:       {} bytes", context.text().len());
    Ok(())
}

/// One-shot question over the full pipeline, no channel involved.
async fn ask(config: ManualBotConfig, question: String) -> Result<()> {
    if question.trim().is_empty() {
        anyhow::bail!("No question given — try: manualbot ask \"how do I reset the router?\"");
    }

    let store = Arc::new(KnowledgeStore::new());
    let provider: Arc<dyn Provider> = Arc::from(manualbot_providers::create_provider(&config)?);

    let ingestor = KnowledgeIngestor::new(Box::new(PdfExtractor::new()));
    let context = ingestor.ingest(&config.docs_path()).await;
    store.set(context).await;

    let generator = AnswerGenerator::new(store, provider);
    let answer = generator.generate(question.trim()).await;
    println!("{answer}");
    Ok(())
}
