//! CLI entrypoint for Book Seeker
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use seeker_application::{
    BookCatalogPort, ChatTurnInput, ChatTurnUseCase, CompositeObserver, FaqSearchPort,
    SessionStore, StateManager, WorkflowDeps, WorkflowObserver, build_workflow,
};
use seeker_domain::Interface;
use seeker_infrastructure::{
    ConfigLoader, FaqKnowledgeBase, FileConfig, InMemorySessionStore, JsonBookCatalog,
    JsonlEventLogger, OpenAiGateway,
};
use seeker_presentation::{ChatRepl, Cli, ConsoleFormatter, ProgressReporter};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources() {
            println!("{line}");
        }
        return Ok(());
    }

    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Kept alive until exit so buffered log lines are flushed
    let _log_guard = init_tracing(&cli, &config);

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {issue}");
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    info!("Starting Book Seeker");

    let interface = match cli.interface {
        Some(arg) => arg.as_str().parse::<Interface>(),
        None => config.workflow.default_interface.parse::<Interface>(),
    }
    .context("Invalid interface")?;

    // === Dependency Injection ===
    let workflow_config = config.to_workflow_config();

    let gateway = Arc::new(OpenAiGateway::from_config(&config.llm));
    if !gateway.has_api_key() {
        warn!(
            "No API key found in ${}; requests may be rejected",
            config.llm.api_key_env
        );
    }

    let faq: Arc<dyn FaqSearchPort> = match config.knowledge.faq_dir_path() {
        Some(dir) => Arc::new(
            FaqKnowledgeBase::load(&dir)
                .with_context(|| format!("Failed to load FAQ directory {}", dir.display()))?,
        ),
        None => {
            warn!("knowledge.faq_dir is not set; FAQ answers will be empty");
            Arc::new(FaqKnowledgeBase::default())
        }
    };

    let catalog: Arc<dyn BookCatalogPort> = match config.knowledge.catalog_file_path() {
        Some(path) => Arc::new(
            JsonBookCatalog::load(&path)
                .with_context(|| format!("Failed to load book catalog {}", path.display()))?,
        ),
        None => {
            warn!("knowledge.catalog_path is not set; no books can be recommended");
            Arc::new(JsonBookCatalog::default())
        }
    };

    let executor = build_workflow(
        WorkflowDeps {
            gateway,
            faq,
            catalog,
        },
        &workflow_config,
    )
    .context("Failed to build workflow")?;

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::from_config(&config.session));
    let states = Arc::new(StateManager::new());
    let use_case = ChatTurnUseCase::new(Arc::new(executor), sessions, states.clone());

    let cancel = CancellationToken::new();
    let state_sweeper = StateManager::spawn_sweeper(
        states,
        SWEEP_INTERVAL,
        workflow_config.state_ttl,
        cancel.clone(),
    );
    let session_sweeper = spawn_session_sweeper(use_case.clone(), cancel.clone());

    let mut observers = CompositeObserver::new();
    if let Some(path) = config.logging.events_file_path() {
        match JsonlEventLogger::new(&path) {
            Some(logger) => {
                info!("Workflow events logged to {}", logger.path().display());
                observers = observers.with(Arc::new(logger));
            }
            None => warn!("Workflow event log disabled"),
        }
    }
    let observer: Arc<dyn WorkflowObserver> = Arc::new(observers);

    let result = match cli.question.clone() {
        Some(question) => run_single(&cli, use_case, interface, question, observer).await,
        None => {
            let mut repl = ChatRepl::new(use_case, interface)
                .with_observer(observer)
                .with_session(cli.session.clone())
                .with_progress(!cli.no_progress)
                .with_streaming(cli.stream);
            repl.run().await.context("Chat session failed")
        }
    };

    cancel.cancel();
    let _ = tokio::join!(state_sweeper, session_sweeper);
    result
}

async fn run_single(
    cli: &Cli,
    use_case: ChatTurnUseCase,
    interface: Interface,
    question: String,
    observer: Arc<dyn WorkflowObserver>,
) -> Result<()> {
    let mut input = ChatTurnInput::new(question, interface.as_str());
    if let Some(session_id) = &cli.session {
        input = input.with_session(session_id.clone());
    }

    if cli.stream {
        let mut rx = use_case.execute_streaming(input, observer);
        while let Some(chunk) = rx.recv().await {
            print!("{}", chunk.to_ndjson());
        }
        return Ok(());
    }

    let output = if cli.show_progress() {
        let progress = CompositeObserver::new()
            .with(observer)
            .with(Arc::new(ProgressReporter::new()));
        use_case.execute_with_observer(input, &progress).await
    } else {
        use_case.execute_with_observer(input, observer.as_ref()).await
    };

    if cli.json {
        println!("{}", ConsoleFormatter::format_json(&output));
    } else {
        println!("{}", ConsoleFormatter::format_turn(&output));
    }
    Ok(())
}

fn spawn_session_sweeper(
    use_case: ChatTurnUseCase,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    use_case.sweep_sessions().await;
                }
            }
        }
    })
}

/// Console logging to stderr plus an optional daily rolling file.
///
/// `RUST_LOG` wins over the `-v` count.
fn init_tracing(cli: &Cli, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    match config.logging.log_dir_path() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "book-seeker.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_filter(filter());
            tracing_subscriber::registry().with(console).with(file).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(console).init();
            None
        }
    }
}
