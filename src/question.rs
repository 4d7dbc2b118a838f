use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::difficulty::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '×',
            Operator::Div => '÷',
        }
    }

    /// Real-number evaluation, no integer truncation
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a / b,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One arithmetic problem. Replaced, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    operand_a: i64,
    operand_b: i64,
    operator: Operator,
}

impl Question {
    pub fn new(operand_a: i64, operand_b: i64, operator: Operator) -> Self {
        Self {
            operand_a,
            operand_b,
            operator,
        }
    }

    /// Draw a question for `difficulty`.
    ///
    /// Both operands come from the difficulty's range and the operator is a
    /// uniform pick from its operator set. For division the dividend is
    /// rewritten to `a * b`, so the quotient is always the drawn `a`.
    pub fn generate<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        let range = difficulty.operand_range();
        let mut a = rng.gen_range(range.clone());
        let b = rng.gen_range(range);
        let operator = *difficulty
            .operators()
            .choose(rng)
            .unwrap_or(&Operator::Add);

        if operator == Operator::Div {
            a *= b;
        }

        Self::new(a, b, operator)
    }

    pub fn operand_a(&self) -> i64 {
        self.operand_a
    }

    pub fn operand_b(&self) -> i64 {
        self.operand_b
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn answer(&self) -> f64 {
        self.operator.apply(self.operand_a as f64, self.operand_b as f64)
    }

    /// `"a op b = result"`, shown once the game is lost
    pub fn solution(&self) -> String {
        format!("{} = {}", self, format_result(self.answer()))
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.operand_a, self.operator, self.operand_b)
    }
}

/// Whole numbers print bare, anything else with two decimals
pub fn format_result(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
