mod api;
mod app;
mod assistant;
mod config;
mod domain;
mod flow;
mod input;
mod logging;
mod persistence;
mod ticker;
mod ui;
mod watchdog;
mod worker;

use anyhow::{Context, Result};
use api::{ApiClient, DiaryDocument};
use app::AppState;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use chrono::Utc;
use domain::{apply_named_action, format_clock, DiaryFormat};
use log::{error, info};
use persistence::{
    clear_session, ensure_data_dir, init_local_data_dir, load_session, load_todos, log_file,
    save_session, save_todos, session_file, todos_file, StoredSession,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use worker::Worker;

#[derive(Parser)]
#[command(name = "diarymind")]
#[command(about = "A diary companion with timed todos, an AI assistant and a focus mode", long_about = None)]
struct Cli {
    /// Server base URL, overriding the config file
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .diarymind directory in the current directory
    Init,
    /// List todos, or apply an action (toggle-hidden, activate, pause, complete) to todo #INDEX
    Todo {
        index: Option<usize>,
        action: Option<String>,
    },
    /// Read and write diaries on the server
    Diary {
        #[command(subcommand)]
        command: DiaryCommand,
    },
    /// Ask the assistant a question
    Chat {
        message: String,
        /// Print the answer as it streams in
        #[arg(long)]
        stream: bool,
    },
    /// Turn a free-text request into a proposed schedule
    Plan { request: String },
    /// Log in and remember the access token
    Login { username: String },
    /// Forget the stored access token
    Logout,
    /// Show the logged-in user
    Whoami,
}

#[derive(Subcommand)]
enum DiaryCommand {
    /// List diary filenames
    List,
    /// Print a diary
    Show { filename: String },
    /// Save a diary, reading the body from --file or stdin
    Save {
        filename: String,
        #[arg(short, long, value_enum, default_value_t = DiaryFormat::Md)]
        format: DiaryFormat,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_data_dir()?;
        config::load_or_init(&data_dir)?;
        println!("Initialized diarymind directory: {}", data_dir.display());
        println!();
        println!("diarymind will now use this local directory for todos and settings.");
        println!("Run 'diarymind' to open the dashboard.");
        return Ok(());
    }

    let data_dir = ensure_data_dir()?;
    let mut config = config::load_or_init(&data_dir)?;
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    let session = load_session(session_file(&data_dir))?;
    let client = ApiClient::new(
        &config.server.base_url,
        config.server.timeout(),
        session.as_ref().map(|s| s.access_token.clone()),
    )
    .context("Invalid server URL")?;

    match cli.command {
        None => {
            logging::init_to_file(&log_file(&data_dir), &config.logging.level)?;
            run_tui(&data_dir, &config, client)
        }
        Some(command) => {
            logging::init_to_stderr(&config.logging.level);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(run_command(command, &client, &data_dir))
        }
    }
}

async fn run_command(command: Commands, client: &ApiClient, data_dir: &Path) -> Result<()> {
    match command {
        Commands::Init => {}
        Commands::Todo { index, action } => {
            let path = todos_file(data_dir);
            let mut todos = load_todos(&path)?;
            if let (Some(index), Some(action)) = (index, action) {
                let id = index
                    .checked_sub(1)
                    .and_then(|i| todos.get(i))
                    .map(|t| t.id)
                    .with_context(|| format!("No todo #{}", index))?;
                todos = apply_named_action(&todos, id, &action, Utc::now());
                save_todos(&path, &todos)?;
            }

            let now = Utc::now();
            for (i, todo) in todos.iter().enumerate() {
                let mark = if todo.completed {
                    "✓"
                } else if todo.active {
                    "▶"
                } else {
                    " "
                };
                println!("{:>3}. [{}] {}  {}", i + 1, mark, todo.text, format_clock(todo.elapsed_ms(now)));
            }
        }
        Commands::Diary { command } => match command {
            DiaryCommand::List => {
                for name in client.list_diaries().await? {
                    println!("{}", name);
                }
            }
            DiaryCommand::Show { filename } => {
                let diary = client.diary_content(&filename).await?;
                println!("{}", diary.content);
            }
            DiaryCommand::Save { filename, format, file } => {
                let content = match file {
                    Some(path) => std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                    None => {
                        let mut buf = String::new();
                        io::stdin().read_to_string(&mut buf)?;
                        buf
                    }
                };
                let saved = client
                    .save_diary(&DiaryDocument {
                        filename,
                        content,
                        format,
                    })
                    .await?;
                println!("Saved {}", saved);
            }
        },
        Commands::Chat { message, stream } => {
            let message = assistant::chat_message(&message);
            if stream {
                let mut chunks = client
                    .stream_chat(assistant::CHAT_ROLE, &message, CancellationToken::new())
                    .await?;
                let mut stdout = io::stdout();
                while let Some(chunk) = chunks.next_chunk().await {
                    write!(stdout, "{}", chunk?)?;
                    stdout.flush()?;
                }
                writeln!(stdout)?;
            } else {
                println!("{}", client.chat(assistant::CHAT_ROLE, &message).await?);
            }
        }
        Commands::Plan { request } => {
            let plan = client.plan_tasks(&request).await?;
            if !plan.suggestion.is_empty() {
                println!("{}", plan.suggestion);
                println!();
            }
            for entry in &plan.schedule {
                println!("  {}", entry.label());
            }
        }
        Commands::Login { username } => {
            eprint!("Password: ");
            io::stderr().flush()?;
            let mut password = String::new();
            io::stdin().read_line(&mut password)?;
            let token = client.login(&username, password.trim_end_matches(['\r', '\n'])).await?;
            save_session(session_file(data_dir), &StoredSession::new(&username, token))?;
            println!("Logged in as {}", username);
        }
        Commands::Logout => {
            if let Err(e) = client.logout().await {
                log::warn!("server logout failed: {}", e);
            }
            clear_session(session_file(data_dir))?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let user = client.me().await?;
            println!("{} <{}> (id {}, since {})", user.username, user.email, user.id, user.created_at);
        }
    }
    Ok(())
}

fn run_tui(data_dir: &Path, config: &Config, client: ApiClient) -> Result<()> {
    eprintln!("Using diarymind directory: {}", data_dir.display());
    info!("starting dashboard against {}", client.base_url());

    let todos_path = todos_file(data_dir);
    let todos = load_todos(&todos_path)?;
    let worker = Worker::new(client)?;

    let mut app = AppState::new(todos, Box::new(worker), config.focus.clone(), Instant::now())
        .with_todos_path(todos_path);
    app.refresh_diaries();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    app.shutdown();

    // Save on exit
    if let Err(e) = app.save() {
        error!("failed to save todos: {}", e);
        eprintln!("Error saving todos: {}", e);
    }

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        // Render
        if app.take_redraw() {
            terminal.draw(|f| ui::render(f, app))?;
        }

        // Handle events with timeout for ticking
        let timeout = ticker::poll_timeout(Instant::now(), app.next_deadline());
        if event::poll(timeout)? {
            let event = event::read()?;
            if input::handle_event(app, event, Instant::now()) {
                return Ok(());
            }
            app.needs_redraw = true;
        }

        // Tick timers and apply background results
        app.tick(Instant::now());

        // Autosave if needed
        if app.needs_save {
            app.save()?;
        }
    }
}
