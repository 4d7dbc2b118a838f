use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::difficulty::Difficulty;
use crate::error::{ConfigError, InputError};
use crate::question::Question;

pub const MIN_SECONDS_PER_QUESTION: u32 = 5;

/// Validated settings for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    pub difficulty: Difficulty,
    pub seconds_per_question: u32,
}

impl QuizConfig {
    /// Validate raw difficulty and time tokens
    pub fn parse(raw_difficulty: &str, raw_time: &str) -> Result<Self, ConfigError> {
        let difficulty = raw_difficulty.parse::<Difficulty>()?;
        let seconds_per_question = leading_integer(raw_time)
            .and_then(|secs| u32::try_from(secs).ok())
            .filter(|secs| *secs >= MIN_SECONDS_PER_QUESTION)
            .ok_or_else(|| ConfigError::InvalidTime(raw_time.trim().to_string()))?;

        Ok(Self {
            difficulty,
            seconds_per_question,
        })
    }
}

/// Optional sign and the digits after it; whatever follows is ignored, so
/// `"7.5"` reads as 7 and `"10s"` as 10
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value = rest[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The session already ended
    GameOver,
    Input(InputError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Rejected(Rejection),
}

/// Result of one clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Counting(i64),
    Expired,
    /// Session was already over
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EndReason {
    #[strum(serialize = "time's up")]
    Timeout,
    #[strum(serialize = "wrong answer")]
    WrongAnswer,
}

/// Frozen result, computed once on the transition into game over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub reason: EndReason,
    pub final_score: u32,
    pub question: Question,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Running,
    Over(GameOver),
}

/// One play-through: question, score and countdown
#[derive(Debug)]
pub struct QuizSession<R: Rng = StdRng> {
    config: QuizConfig,
    question: Question,
    score: u32,
    time_remaining: i64,
    phase: Phase,
    rng: R,
}

impl QuizSession<StdRng> {
    pub fn create(raw_difficulty: &str, raw_time: &str) -> Result<Self, ConfigError> {
        Self::create_with_rng(raw_difficulty, raw_time, StdRng::from_entropy())
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn create_with_rng(
        raw_difficulty: &str,
        raw_time: &str,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let config = QuizConfig::parse(raw_difficulty, raw_time)?;
        Ok(Self::new(config, rng))
    }

    pub fn new(config: QuizConfig, mut rng: R) -> Self {
        let question = Question::generate(config.difficulty, &mut rng);
        debug!(%question, difficulty = %config.difficulty, "session started");
        Self {
            config,
            question,
            score: 0,
            time_remaining: i64::from(config.seconds_per_question),
            phase: Phase::Running,
            rng,
        }
    }

    /// Throw away progress and start over with the same settings
    pub fn restart(&mut self) {
        self.question = self.generate_question();
        self.score = 0;
        self.time_remaining = i64::from(self.config.seconds_per_question);
        self.phase = Phase::Running;
        debug!(question = %self.question, "session restarted");
    }

    pub fn generate_question(&mut self) -> Question {
        Question::generate(self.config.difficulty, &mut self.rng)
    }

    pub fn submit_answer(&mut self, raw_input: &str) -> Outcome {
        if self.is_over() {
            return Outcome::Rejected(Rejection::GameOver);
        }

        let trimmed = raw_input.trim();
        if trimmed.is_empty() {
            return Outcome::Rejected(Rejection::Input(InputError::Empty));
        }

        // the whole entry must be a number; `10abc` is not read as 10
        let answer = match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Outcome::Rejected(Rejection::Input(InputError::NotANumber(
                    trimmed.to_string(),
                )))
            }
        };

        if answer == self.question.answer() {
            self.score += 1;
            self.time_remaining = i64::from(self.config.seconds_per_question);
            self.question = self.generate_question();
            debug!(score = self.score, next = %self.question, "correct answer");
            Outcome::Correct
        } else {
            self.end(EndReason::WrongAnswer);
            Outcome::Incorrect
        }
    }

    /// Advance the countdown by one whole second
    pub fn on_tick(&mut self) -> Tick {
        if self.is_over() {
            return Tick::Ignored;
        }

        self.time_remaining -= 1;
        if self.time_remaining <= 0 {
            self.end(EndReason::Timeout);
            Tick::Expired
        } else {
            Tick::Counting(self.time_remaining)
        }
    }

    fn end(&mut self, reason: EndReason) {
        if self.is_over() {
            return;
        }
        let over = GameOver {
            reason,
            final_score: self.score,
            question: self.question,
            correct_answer: self.question.solution(),
        };
        info!(%reason, score = over.final_score, answer = %over.correct_answer, "game over");
        self.phase = Phase::Over(over);
    }

    pub fn config(&self) -> QuizConfig {
        self.config
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn question_text(&self) -> String {
        self.question.to_string()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> i64 {
        self.time_remaining
    }

    /// Share of the per-question time left, in `[0, 1]`
    pub fn time_fraction(&self) -> f64 {
        let total = f64::from(self.config.seconds_per_question);
        (self.time_remaining as f64 / total).clamp(0.0, 1.0)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Over(_))
    }

    pub fn game_over(&self) -> Option<&GameOver> {
        match &self.phase {
            Phase::Over(over) => Some(over),
            Phase::Running => None,
        }
    }

    #[cfg(test)]
    fn with_question(mut self, question: Question) -> Self {
        self.question = question;
        self
    }
}
