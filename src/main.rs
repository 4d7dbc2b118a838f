use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use mathdash::{
    app::{App, Effect},
    config::{ConfigStore, FileConfigStore, MemoryConfigStore},
    logging,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, Stamped, Ticker},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::Instant,
};

/// timed arithmetic sprint: one wrong answer or one empty bar and it's over
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Answer randomly generated arithmetic questions before the time bar runs out. Start from the menu, or pass both --difficulty and --time to jump straight into a game."
)]
pub struct Cli {
    /// difficulty: easy, medium or hard
    #[clap(short = 'd', long)]
    difficulty: Option<String>,

    /// seconds per question, at least 5
    #[clap(short = 't', long)]
    time: Option<String>,

    /// seed for reproducible questions
    #[clap(long)]
    seed: Option<u64>,

    /// do not read or write the saved menu settings
    #[clap(long)]
    no_save: bool,

    /// log file location (defaults to the state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Raw settings to launch with, filling a missing half from saved settings
    fn launch_args(&self, store: &dyn ConfigStore) -> Option<(String, String)> {
        if self.difficulty.is_none() && self.time.is_none() {
            return None;
        }
        let saved = store.load();
        Some((
            self.difficulty
                .clone()
                .unwrap_or_else(|| saved.difficulty.to_string()),
            self.time
                .clone()
                .unwrap_or_else(|| saved.seconds_per_question.to_string()),
        ))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init_logging(cli.verbose, cli.log_file.as_deref());

    let store: Box<dyn ConfigStore> = if cli.no_save {
        Box::new(MemoryConfigStore::default())
    } else {
        Box::new(FileConfigStore::new())
    };
    let launch = cli.launch_args(&*store);
    let mut app = App::new(store, cli.seed);
    if let Some((difficulty, time)) = launch {
        app.launch(&difficulty, &time, Instant::now());
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
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
        let Stamped { event, at } = runner.step();
        let effects = app.dispatch(event, at);

        let mut redraw = false;
        for effect in effects {
            match effect {
                Effect::Quit => return Ok(()),
                Effect::Redraw => redraw = true,
                Effect::Bell => {
                    let mut out = io::stdout();
                    out.write_all(b"\x07")?;
                    out.flush()?;
                }
            }
        }

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdash::config::Config;
    use mathdash::difficulty::Difficulty;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["mathdash"]);

        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.time, None);
        assert_eq!(cli.seed, None);
        assert!(!cli.no_save);
        assert_eq!(cli.log_file, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_difficulty_and_time() {
        let cli = Cli::parse_from(["mathdash", "-d", "hard", "-t", "15"]);
        assert_eq!(cli.difficulty.as_deref(), Some("hard"));
        assert_eq!(cli.time.as_deref(), Some("15"));

        let cli = Cli::parse_from(["mathdash", "--difficulty", "easy", "--time", "5"]);
        assert_eq!(cli.difficulty.as_deref(), Some("easy"));
        assert_eq!(cli.time.as_deref(), Some("5"));
    }

    #[test]
    fn test_cli_keeps_invalid_values_raw() {
        // validation happens in the session so the menu can show the error
        let cli = Cli::parse_from(["mathdash", "-d", "expert", "-t", "abc"]);
        assert_eq!(cli.difficulty.as_deref(), Some("expert"));
        assert_eq!(cli.time.as_deref(), Some("abc"));
    }

    #[test]
    fn test_cli_seed_and_verbosity() {
        let cli = Cli::parse_from(["mathdash", "--seed", "42", "-vv"]);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_non_numeric_seed() {
        assert!(Cli::try_parse_from(["mathdash", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_launch_args_none_without_flags() {
        let cli = Cli::parse_from(["mathdash"]);
        assert_eq!(cli.launch_args(&MemoryConfigStore::default()), None);
    }

    #[test]
    fn test_launch_args_fill_from_saved_settings() {
        let store = MemoryConfigStore::default();
        store
            .save(&Config {
                difficulty: Difficulty::Easy,
                seconds_per_question: 25,
            })
            .unwrap();

        let cli = Cli::parse_from(["mathdash", "-t", "7"]);
        assert_eq!(
            cli.launch_args(&store),
            Some(("easy".to_string(), "7".to_string()))
        );

        let cli = Cli::parse_from(["mathdash", "-d", "hard"]);
        assert_eq!(
            cli.launch_args(&store),
            Some(("hard".to_string(), "25".to_string()))
        );
    }

    #[test]
    fn test_cli_command_is_well_formed() {
        Cli::command().debug_assert();
    }
}
