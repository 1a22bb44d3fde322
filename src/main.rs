use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use log::{debug, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use typr::{
    app::{App, AppAction},
    config::{ConfigStore, FileConfigStore},
    language::{Language, Snippet},
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    TyprError, TICK_RATE_MS,
};

/// code typing practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reproduce real code snippets character by character. typr counts every wrong key and reports words per minute once the snippet is done."
)]
pub struct Cli {
    /// language of the built-in snippet to type
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// custom text to type instead of a built-in snippet
    #[clap(short = 'p', long, conflicts_with = "file")]
    prompt: Option<String>,

    /// type the contents of a file instead of a built-in snippet
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// start on a randomly chosen language
    #[clap(long, conflicts_with = "language")]
    random: bool,

    /// print the available languages and exit
    #[clap(long)]
    list: bool,

    /// read and write settings at this path instead of the default config location
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn initial_language(&self, store: &dyn ConfigStore) -> Language {
        if self.random {
            return Language::random();
        }
        self.language.unwrap_or_else(|| store.load().language)
    }

    fn snippet(&self, language: Language) -> Result<Snippet, TyprError> {
        match (&self.prompt, &self.file) {
            (Some(prompt), _) => Snippet::custom("prompt", prompt.as_str()),
            (None, Some(path)) => Snippet::from_file(path),
            (None, None) => Snippet::builtin(language),
        }
    }

    fn config_store(&self) -> Box<dyn ConfigStore> {
        match &self.config {
            Some(path) => Box::new(FileConfigStore::with_path(path)),
            None => Box::new(FileConfigStore::new()),
        }
    }
}

fn language_listing() -> String {
    Language::ALL
        .iter()
        .map(|l| format!("{:<12}{}", l.key(), l))
        .join("\n")
}

fn init_logging() {
    // stderr shares the terminal with the tui, so logging is opt-in
    if std::env::var_os("RUST_LOG").is_some() {
        colog::default_builder().parse_default_env().init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let cli = Cli::parse();

    if cli.list {
        println!("{}", language_listing());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, TyprError::NotATerminal).exit();
    }

    let store = cli.config_store();
    let language = cli.initial_language(store.as_ref());
    let snippet = cli.snippet(language)?;
    info!("starting on {} ({} chars)", snippet.name(), snippet.text().chars().count());
    let mut app = App::with_snippet(snippet, language, store);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    runner.attach();
    let result = start_tui(&mut terminal, &mut app, &runner);
    runner.detach();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                // only the running clock changes between keys
                if app.session.has_started() && !app.session.has_finished() {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Key(key) => {
                if app.handle_key(key)? == AppAction::Quit {
                    debug!("quit requested");
                    break;
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Closed => {
                debug!("terminal event source closed");
                break;
            }
        }
    }

    Ok(())
}
