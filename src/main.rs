use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use docprompt_core::ingest::normalize_dropped_path;
use docprompt_core::{Config, Phase, Provider, Session};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "docprompt")]
#[command(version, about = "Send a document (or a folder) and a prompt to a generative AI model")]
struct Cli {
    /// File or folder to attach on startup
    path: Option<PathBuf>,

    /// Prompt to prefill (required with --print)
    #[arg(short, long)]
    prompt: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// API key; overrides GEMINI_API_KEY and the config file
    #[arg(long)]
    api_key: Option<String>,

    /// Run once without the TUI and print the result to stdout
    #[arg(long, requires_all = ["path", "prompt"])]
    print: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.print);

    let config = Config::load_or_default();
    let api_key = config.resolve_api_key(cli.api_key.as_deref());
    let model = config.resolve_model(cli.model.as_deref());
    let provider = Provider::select(api_key.as_deref(), &model);
    info!(provider = provider.as_str(), %model, "starting docprompt");

    let mut session = Session::new();
    if let Some(prompt) = &cli.prompt {
        session.set_prompt(prompt.clone());
    }
    if let Some(path) = &cli.path {
        let path = normalize_dropped_path(&path.to_string_lossy());
        // In the TUI a failed preselect just shows up in the upload panel
        let selected = session.select_path(&path).await;
        if cli.print {
            selected?;
        }
    }

    if cli.print {
        return run_headless(session, &provider).await;
    }

    run_tui(App::new(session, provider, config)).await
}

async fn run_headless(mut session: Session, provider: &Provider) -> Result<()> {
    if let Some(notice) = provider.configuration_notice() {
        eprintln!("{}", notice);
    }

    if !session.submit(provider).await {
        return Err(anyhow!("Nothing to submit: the prompt is empty"));
    }

    match session.phase() {
        Phase::Success => {
            println!("{}", session.result());
            Ok(())
        }
        _ => Err(anyhow!(
            "{}",
            session.error().unwrap_or("Generation failed")
        )),
    }
}

async fn run_tui(mut app: App) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}

/// Log to a file while the TUI owns the terminal; in `--print` mode log to
/// stderr, but only when `RUST_LOG` asks for it.
fn init_logging(headless: bool) -> Option<WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "docprompt=info,docprompt_core=info".into())
    };

    if headless {
        if std::env::var_os("RUST_LOG").is_some() {
            tracing_subscriber::registry()
                .with(filter())
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        return None;
    }

    let log_dir = dirs::data_local_dir()?.join("docprompt").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(&log_dir, "docprompt.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}
