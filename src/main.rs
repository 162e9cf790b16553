mod common;
mod config;
mod controller;
mod diagnostics;
mod network;
mod storage;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config::AppConfig;
use controller::ChatController;
use dotenvy::dotenv;
use network::{ChatClient, ChatTransport, HttpTransport};
use storage::{MemoryStore, SessionStore, SqliteStore};
use tokio::sync::mpsc;
use ui::ChatApp;
use ui::markup::RenderMode;
use ui::view::ChatContainer;

#[derive(Parser)]
#[command(
    name = "chat-widget",
    version,
    about = "Desktop chat widget for a /chat backend"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Base URL of the chat backend
    #[arg(long, env = "CHAT_SERVER_URL", value_name = "URL")]
    server_url: Option<String>,
    /// How message text is displayed
    #[arg(long, env = "CHAT_RENDER_MODE", value_enum)]
    render_mode: Option<RenderMode>,
    /// Keep the session id in this SQLite file instead of memory
    #[arg(long, env = "CHAT_SESSION_DB", value_name = "FILE")]
    session_db: Option<PathBuf>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
enum Mode {
    /// Send one message without opening a window and print the transcript
    Ask { message: String },
    /// Write the effective configuration to the config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    app_config.apply_overrides(cli.server_url, cli.render_mode, cli.session_db);
    app_config.validate()?;

    log::info!("Chat backend: {}", app_config.server_url);
    log::info!("Render mode: {:?}", app_config.render_mode);

    match cli.mode {
        Some(Mode::InitConfig) => {
            config::save_config(&cli.config, &app_config)?;
            log::info!("Wrote configuration to {}", cli.config);
            Ok(())
        }
        Some(Mode::Ask { message }) => run_headless(app_config, message).await,
        None => run_full_client(app_config).await,
    }
}

fn build_controller(app_config: &AppConfig) -> Result<ChatController, Box<dyn Error>> {
    let store: Box<dyn SessionStore> = match &app_config.session_db {
        Some(path) => Box::new(SqliteStore::open(path)?),
        None => Box::new(MemoryStore::default()),
    };
    Ok(ChatController::new(
        store,
        app_config.render_mode,
        app_config.avatar_url(),
    ))
}

async fn run_headless(app_config: AppConfig, message: String) -> Result<(), Box<dyn Error>> {
    let transport = HttpTransport::new(&app_config.server_url);
    log::debug!("Chat endpoint: {}", transport.endpoint());
    let mut controller = build_controller(&app_config)?;
    let mut container = ChatContainer::new();
    let mut input = message;

    if let Some(request) = controller.submit(&mut input, &mut container) {
        let outcome = transport.send(request).await;
        controller.apply(outcome, &mut container);
    }

    for line in container.transcript() {
        println!("{line}");
    }
    Ok(())
}

async fn run_full_client(app_config: AppConfig) -> Result<(), Box<dyn Error>> {
    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy Network Thread (Chạy ngầm)
    let transport = HttpTransport::new(&app_config.server_url);
    log::info!("Chat endpoint: {}", transport.endpoint());
    tokio::spawn(ChatClient::new(Box::new(transport), event_tx, cmd_rx).run());

    // 3. Khởi chạy UI (Chạy trên Main Thread)
    let controller = build_controller(&app_config)?;
    let title = app_config.window_title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([720.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            log::info!("Chat window opened");
            Ok(Box::new(ChatApp::new(
                cc,
                app_config.window_title,
                controller,
                cmd_tx,
                event_rx,
            )))
        }),
    )?;
    Ok(())
}
