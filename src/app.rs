use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigStore, MAX_SECONDS_PER_QUESTION};
use crate::difficulty::Difficulty;
use crate::error::InputError;
use crate::quiz::{Outcome, QuizSession, Rejection, Tick, MIN_SECONDS_PER_QUESTION};
use crate::runtime::{AppEvent, IntervalTimer};

const MAX_INPUT_LEN: usize = 16;
const PAGE_STEP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

/// Side effects requested by a dispatch, carried out by the terminal loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Redraw,
    /// Audible cue for a lost game
    Bell,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub difficulty: Difficulty,
    pub seconds_per_question: u32,
    /// Why the last launch attempt bounced back here
    pub error: Option<String>,
}

impl From<Config> for MenuState {
    fn from(cfg: Config) -> Self {
        let cfg = cfg.clamped();
        Self {
            difficulty: cfg.difficulty,
            seconds_per_question: cfg.seconds_per_question,
            error: None,
        }
    }
}

impl MenuState {
    fn adjust_time(&mut self, delta: i64) {
        let secs = i64::from(self.seconds_per_question) + delta;
        self.seconds_per_question = secs.clamp(
            i64::from(MIN_SECONDS_PER_QUESTION),
            i64::from(MAX_SECONDS_PER_QUESTION),
        ) as u32;
    }
}

/// Owns the active session and routes input, ticks and navigation into it
pub struct App {
    screen: Screen,
    menu: MenuState,
    session: Option<QuizSession>,
    input: String,
    notice: Option<String>,
    timer: IntervalTimer,
    rng: StdRng,
    store: Box<dyn ConfigStore>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("menu", &self.menu)
            .field("session", &self.session)
            .field("input", &self.input)
            .field("notice", &self.notice)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Start on the menu, prefilled from the store
    pub fn new(store: Box<dyn ConfigStore>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            screen: Screen::Menu,
            menu: MenuState::from(store.load()),
            session: None,
            input: String::new(),
            notice: None,
            timer: IntervalTimer::default(),
            rng,
            store,
        }
    }

    /// Validate raw settings and start a game, or fall back to the menu with the error
    pub fn launch(&mut self, raw_difficulty: &str, raw_time: &str, now: Instant) -> Vec<Effect> {
        let session_rng = StdRng::seed_from_u64(self.rng.gen());
        match QuizSession::create_with_rng(raw_difficulty, raw_time, session_rng) {
            Ok(session) => {
                let cfg = Config::from(session.config());
                info!(difficulty = %cfg.difficulty, secs = cfg.seconds_per_question, "game started");
                self.menu = MenuState::from(cfg);
                self.session = Some(session);
                self.enter_playing(now);
            }
            Err(err) => {
                warn!(%err, "rejected game settings");
                self.timer.cancel();
                self.session = None;
                self.screen = Screen::Menu;
                self.menu.error = Some(err.to_string());
            }
        }
        vec![Effect::Redraw]
    }

    /// Route one runner event
    pub fn dispatch(&mut self, event: AppEvent, now: Instant) -> Vec<Effect> {
        match event {
            AppEvent::Tick => self.on_tick(now),
            AppEvent::Resize => vec![Effect::Redraw],
            AppEvent::Key(key) => self.on_key(key, now),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Effect::Quit];
        }

        match self.screen {
            Screen::Menu => self.on_menu_key(key, now),
            Screen::Playing => self.on_playing_key(key, now),
            Screen::GameOver => self.on_game_over_key(key, now),
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        self.menu.error = None;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return vec![Effect::Quit],
            KeyCode::Char('1') => self.menu.difficulty = Difficulty::Easy,
            KeyCode::Char('2') => self.menu.difficulty = Difficulty::Medium,
            KeyCode::Char('3') => self.menu.difficulty = Difficulty::Hard,
            KeyCode::Left => self.menu.difficulty = self.menu.difficulty.prev(),
            KeyCode::Right => self.menu.difficulty = self.menu.difficulty.next(),
            KeyCode::Up => self.menu.adjust_time(1),
            KeyCode::Down => self.menu.adjust_time(-1),
            KeyCode::PageUp => self.menu.adjust_time(i64::from(PAGE_STEP)),
            KeyCode::PageDown => self.menu.adjust_time(-i64::from(PAGE_STEP)),
            KeyCode::Enter => {
                let cfg = Config {
                    difficulty: self.menu.difficulty,
                    seconds_per_question: self.menu.seconds_per_question,
                };
                if let Err(err) = self.store.save(&cfg) {
                    warn!(%err, "could not save settings");
                }
                let (difficulty, secs) = (cfg.difficulty.to_string(), cfg.seconds_per_question);
                return self.launch(&difficulty, &secs.to_string(), now);
            }
            _ => {}
        }
        vec![Effect::Redraw]
    }

    fn on_playing_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        self.notice = None;
        match key.code {
            KeyCode::Esc => {
                self.back();
            }
            KeyCode::Enter => return self.submit(now),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if is_answer_char(c) && self.input.len() < MAX_INPUT_LEN => {
                self.input.push(c);
            }
            _ => {}
        }
        vec![Effect::Redraw]
    }

    fn on_game_over_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => self.restart(now),
            KeyCode::Char('b') | KeyCode::Esc => {
                self.back();
                vec![Effect::Redraw]
            }
            KeyCode::Char('q') => vec![Effect::Quit],
            _ => vec![],
        }
    }

    /// Submit the typed answer to the session
    pub fn submit(&mut self, now: Instant) -> Vec<Effect> {
        // seconds that ran out since the last tick count before the answer
        let caught_up = self.on_tick(now);
        if self.screen != Screen::Playing {
            return caught_up;
        }
        let Some(session) = self.session.as_mut() else {
            return caught_up;
        };
        let raw = std::mem::take(&mut self.input);

        let effects = match session.submit_answer(&raw) {
            Outcome::Correct => {
                self.timer.restart(now);
                vec![Effect::Redraw]
            }
            Outcome::Incorrect => self.enter_game_over(),
            Outcome::Rejected(Rejection::Input(InputError::Empty)) => vec![],
            Outcome::Rejected(Rejection::Input(err)) => {
                // a rejected entry stays editable
                self.input = raw;
                self.notice = Some(err.to_string());
                vec![Effect::Redraw]
            }
            Outcome::Rejected(Rejection::GameOver) => vec![],
        };
        if effects.is_empty() {
            caught_up
        } else {
            effects
        }
    }

    /// Feed elapsed game seconds into the session
    pub fn on_tick(&mut self, now: Instant) -> Vec<Effect> {
        let fired = self.timer.poll(now);
        if fired == 0 {
            return vec![];
        }
        let Some(session) = self.session.as_mut() else {
            self.timer.cancel();
            return vec![];
        };

        for _ in 0..fired {
            match session.on_tick() {
                Tick::Counting(left) => debug!(left, "countdown"),
                Tick::Expired => return self.enter_game_over(),
                Tick::Ignored => {
                    self.timer.cancel();
                    break;
                }
            }
        }
        vec![Effect::Redraw]
    }

    /// Same settings, fresh score and question
    pub fn restart(&mut self, now: Instant) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return vec![];
        };
        session.restart();
        self.enter_playing(now);
        vec![Effect::Redraw]
    }

    /// Leave the game for the menu
    pub fn back(&mut self) {
        self.timer.cancel();
        self.session = None;
        self.input.clear();
        self.notice = None;
        self.screen = Screen::Menu;
    }

    fn enter_playing(&mut self, now: Instant) {
        self.input.clear();
        self.notice = None;
        self.screen = Screen::Playing;
        self.timer.restart(now);
    }

    fn enter_game_over(&mut self) -> Vec<Effect> {
        self.timer.cancel();
        self.input.clear();
        self.notice = None;
        self.screen = Screen::GameOver;
        vec![Effect::Bell, Effect::Redraw]
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }
}

fn is_answer_char(c: char) -> bool {
    c.is_ascii_digit() || c == '-' || c == '.'
}
