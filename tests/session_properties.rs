use assert_matches::assert_matches;
use mathdash::difficulty::Difficulty;
use mathdash::error::{ConfigError, InputError};
use mathdash::question::{Operator, Question};
use mathdash::quiz::{Outcome, QuizSession, Rejection, Tick};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded(difficulty: &str, secs: &str, seed: u64) -> QuizSession {
    QuizSession::create_with_rng(difficulty, secs, StdRng::seed_from_u64(seed)).unwrap()
}

#[test]
fn config_errors_from_raw_tokens() {
    assert_matches!(
        QuizSession::create("expert", "10"),
        Err(ConfigError::InvalidDifficulty(d)) if d == "expert"
    );
    assert_matches!(
        QuizSession::create("easy", "3"),
        Err(ConfigError::InvalidTime(t)) if t == "3"
    );
}

#[test]
fn generated_sessions_stay_in_range() {
    for (token, difficulty) in [
        ("easy", Difficulty::Easy),
        ("medium", Difficulty::Medium),
        ("hard", Difficulty::Hard),
    ] {
        let range = difficulty.operand_range();
        let mut session = seeded(token, "10", 77);
        for _ in 0..1000 {
            let q = session.generate_question();
            assert!(range.contains(&q.operand_b()));
            if q.operator() == Operator::Div {
                assert_eq!(q.operand_a() % q.operand_b(), 0);
                assert!(range.contains(&(q.operand_a() / q.operand_b())));
            } else {
                assert!(range.contains(&q.operand_a()));
            }
        }
    }
}

#[test]
fn whitespace_submission_is_inert() {
    let mut session = seeded("medium", "9", 5);
    session.on_tick();
    let before = (session.score(), session.time_remaining(), session.is_over());
    assert_eq!(
        session.submit_answer("  \t "),
        Outcome::Rejected(Rejection::Input(InputError::Empty))
    );
    assert_eq!(
        (session.score(), session.time_remaining(), session.is_over()),
        before
    );
}

#[test]
fn five_ticks_end_a_five_second_question() {
    let mut session = seeded("hard", "5", 9);
    let ticks: Vec<Tick> = (0..5).map(|_| session.on_tick()).collect();
    assert_eq!(ticks.last(), Some(&Tick::Expired));
    assert!(session.is_over());
    assert!(session.time_remaining() <= 0);
    assert_eq!(session.on_tick(), Tick::Ignored);
}

#[test]
fn game_over_blocks_further_answers() {
    let mut session = seeded("easy", "10", 13);
    let right = format!("{}", session.question().answer());
    assert_eq!(session.submit_answer(&right), Outcome::Correct);

    let wrong = format!("{}", session.question().answer() + 100.0);
    assert_eq!(session.submit_answer(&wrong), Outcome::Incorrect);

    let right = format!("{}", session.question().answer());
    assert_eq!(
        session.submit_answer(&right),
        Outcome::Rejected(Rejection::GameOver)
    );
    assert_eq!(session.score(), 1);
    assert_eq!(session.game_over().unwrap().final_score, 1);
}

#[test]
fn correct_answer_strings() {
    assert_eq!(
        Question::new(50, 20, Operator::Div).solution(),
        "50 ÷ 20 = 2.50"
    );
    assert_eq!(Question::new(4, 2, Operator::Add).solution(), "4 + 2 = 6");
}
