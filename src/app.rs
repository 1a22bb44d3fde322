use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{error, info};

use crate::config::{Config, ConfigStore};
use crate::error::Result;
use crate::key::KeyInput;
use crate::language::{Language, Snippet};
use crate::session::{Outcome, Session};

/// Which surface receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Typing,
    LanguagePicker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

pub struct App {
    pub session: Session,
    pub language: Language,
    pub focus: Focus,
    /// Highlighted row while the picker is open
    pub picker_index: usize,
    pub config: Config,
    store: Box<dyn ConfigStore>,
}

impl App {
    /// Start on the built-in snippet for `language`
    pub fn new(language: Language, store: Box<dyn ConfigStore>) -> Result<Self> {
        let snippet = Snippet::builtin(language)?;
        Ok(Self::with_snippet(snippet, language, store))
    }

    /// Start on an arbitrary snippet; `language` is where language cycling starts from
    pub fn with_snippet(snippet: Snippet, language: Language, store: Box<dyn ConfigStore>) -> Self {
        let config = store.load().sanitized();
        Self {
            session: Session::new(snippet),
            language,
            focus: Focus::Typing,
            picker_index: language.index(),
            config,
            store,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<AppAction> {
        if key.kind == KeyEventKind::Release {
            return Ok(AppAction::Continue);
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Ok(AppAction::Quit);
        }

        match self.focus {
            Focus::LanguagePicker => self.handle_picker_key(key)?,
            Focus::Typing => match key.code {
                KeyCode::Esc => return Ok(AppAction::Quit),
                KeyCode::Char('r') if ctrl => self.reset(),
                KeyCode::Char('l') if ctrl => self.open_picker(),
                KeyCode::Left => self.select_language(self.language.prev())?,
                KeyCode::Right => self.select_language(self.language.next())?,
                _ => {
                    let was_finished = self.session.has_finished();
                    let outcome = self.session.handle_key(KeyInput::from(key));
                    if outcome == Outcome::Advanced && !was_finished && self.session.has_finished() {
                        info!(
                            "finished {}: {} wpm, {} mistakes",
                            self.session.snippet().name(),
                            self.session
                                .wpm()
                                .map_or_else(|| "-".to_string(), |w| w.to_string()),
                            self.session.mistakes()
                        );
                    }
                }
            },
        }
        Ok(AppAction::Continue)
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Result<()> {
        let count = Language::ALL.len();
        match key.code {
            KeyCode::Esc => self.focus = Focus::Typing,
            KeyCode::Up => self.picker_index = (self.picker_index + count - 1) % count,
            KeyCode::Down => self.picker_index = (self.picker_index + 1) % count,
            KeyCode::Enter => self.select_language(Language::ALL[self.picker_index])?,
            _ => {}
        }
        Ok(())
    }

    /// Back to the start of the current snippet with focus on the typing surface
    pub fn reset(&mut self) {
        self.session.reset();
        self.focus = Focus::Typing;
    }

    pub fn open_picker(&mut self) {
        self.picker_index = self.language.index();
        self.focus = Focus::LanguagePicker;
    }

    /// Swap to the built-in snippet for `language` and reset the session.
    /// The choice is remembered as the preferred language.
    pub fn select_language(&mut self, language: Language) -> Result<()> {
        let snippet = Snippet::builtin(language)?;
        info!("switching to {}", language.key());
        self.language = language;
        self.picker_index = language.index();
        self.session.replace_snippet(snippet);
        self.reset();

        if self.config.language != language {
            self.config.language = language;
            if let Err(e) = self.store.save(&self.config) {
                error!("Error while saving config file: {}", e);
            }
        }
        Ok(())
    }
}
