//! Evaluation contract between programs and fitness problems.

use crate::interpreter::Interpreter;
use psh_core::{Error, Fitness, Result};
use psh_ir::{Atom, Program};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Scores a program by running it on an interpreter
pub trait Problem {
    fn evaluate(&self, interpreter: &mut Interpreter, program: &Program) -> Result<Fitness>;
}

/// One input/output pair of a regression problem
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: f32,
    pub output: f32,
}

/// Float symbolic regression scored by mean absolute error
#[derive(Debug, Clone)]
pub struct FloatRegression {
    cases: Vec<TestCase>,
    /// How many copies of the input are pushed onto the float stack
    pub repeat_float_stack: usize,
    /// Error charged when the float stack is empty after a run
    pub missing_result_penalty: f32,
    /// Errors below this count as hits
    pub hit_threshold: f32,
}

impl FloatRegression {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self {
            cases,
            repeat_float_stack: 1,
            missing_result_penalty: 1000.0,
            hit_threshold: 0.01,
        }
    }

    /// Parse whitespace-separated `input output` pairs
    pub fn from_text(text: &str) -> Result<Self> {
        let values = text
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f32>()
                    .map_err(|_| Error::Parse(format!("bad test case value \"{}\"", token)))
            })
            .collect::<Result<Vec<f32>>>()?;

        if values.len() % 2 != 0 {
            return Err(Error::Parse(
                "test cases must come in input/output pairs".to_string(),
            ));
        }

        let cases = values
            .chunks_exact(2)
            .map(|pair| TestCase {
                input: pair[0],
                output: pair[1],
            })
            .collect();
        Ok(Self::new(cases))
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Absolute error of `program` on one case
    pub fn case_error(&self, interpreter: &mut Interpreter, program: &Program, case: &TestCase) -> Result<f32> {
        let repeat = self.repeat_float_stack;
        interpreter.evaluate_case(program, |interpreter| {
            for _ in 0..repeat {
                interpreter.stacks_mut().float.push(case.input);
            }
            interpreter.input_stack_mut().push(Atom::Float(case.input));
        })?;

        let error = match interpreter.stacks().float.top() {
            Some(result) => (result - case.output).abs(),
            None => self.missing_result_penalty,
        };
        trace!(input = case.input, error, "evaluated case");
        Ok(error)
    }
}

impl Problem for FloatRegression {
    fn evaluate(&self, interpreter: &mut Interpreter, program: &Program) -> Result<Fitness> {
        let errors = self
            .cases
            .iter()
            .map(|case| self.case_error(interpreter, program, case))
            .collect::<Result<Vec<f32>>>()?;
        Ok(Fitness::from_errors(errors, self.hit_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psh_core::PushConfig;
    use psh_ir::parse_program;

    fn squares() -> FloatRegression {
        FloatRegression::from_text("1 1\n2 4\n3 9\n-0.5 0.25").unwrap()
    }

    #[test]
    fn test_from_text() {
        let problem = squares();
        assert_eq!(problem.cases().len(), 4);
        assert_eq!(problem.cases()[3], TestCase { input: -0.5, output: 0.25 });
        assert!(matches!(FloatRegression::from_text("1 2 3"), Err(Error::Parse(_))));
        assert!(matches!(FloatRegression::from_text("1 x"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_perfect_program() {
        let mut interpreter = Interpreter::new(PushConfig::default());
        let program = parse_program("( float.dup float.* )").unwrap();
        let fitness = squares().evaluate(&mut interpreter, &program).unwrap();
        assert!(fitness.is_ideal());
        assert_eq!(fitness.hits, 4);
    }

    #[test]
    fn test_missing_result_is_penalized() {
        let mut interpreter = Interpreter::new(PushConfig::default());
        let program = parse_program("( float.pop )").unwrap();
        let fitness = squares().evaluate(&mut interpreter, &program).unwrap();
        assert_eq!(fitness.standardized, 1000.0);
        assert_eq!(fitness.hits, 0);
    }

    #[test]
    fn test_identity_program_error() {
        let mut interpreter = Interpreter::new(PushConfig::default());
        let fitness = squares().evaluate(&mut interpreter, &Program::new()).unwrap();
        // |1-1| + |2-4| + |3-9| + |-0.5-0.25|
        assert!((fitness.standardized - 8.75 / 4.0).abs() < 1e-6);
        assert_eq!(fitness.hits, 1);
    }

    #[test]
    fn test_input_stack_is_seeded() {
        let mut interpreter = Interpreter::new(PushConfig::default());
        let mut problem = squares();
        problem.repeat_float_stack = 0;
        let program = parse_program("( input.inall input.inall float.* )").unwrap();
        let fitness = problem.evaluate(&mut interpreter, &program).unwrap();
        assert!(fitness.is_ideal());
    }
}
