// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod logging;
pub mod question;
pub mod quiz;
pub mod runtime;
pub mod ui;

pub use app::{App, Effect, Screen};
pub use error::{ConfigError, InputError};
pub use question::{Operator, Question};
pub use quiz::{Outcome, QuizConfig, QuizSession};
