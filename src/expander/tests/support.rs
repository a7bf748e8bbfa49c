use pretty_assertions::assert_eq;
use std::{cell::RefCell, collections::VecDeque};

use crate::{
    calculator::{Calculator, CalculatorError},
    context::Context,
    definition::MacroDefinition,
    expander::{EvalError, Evaluator},
    registry::Registry,
};

pub const MACRO_NAMES: [&str; 8] = [
    "REF_DSL",
    "SUM",
    "REF_ALIAS",
    "REF_THIS",
    "UUID",
    "GET_MONTH",
    "RANDBETWEEN",
    "TEST_CASE_SHORT_NAME",
];

/// Expected call: macro name, actual arguments, returned text.
pub type Step = (&'static str, &'static [&'static str], &'static str);

/// Calculator double that checks every call against a script of
/// expected calls, in order.
pub struct ScriptedCalculator {
    steps: RefCell<VecDeque<Step>>,
}

impl ScriptedCalculator {
    pub fn new(steps: &[Step]) -> Self {
        Self {
            steps: RefCell::new(steps.iter().copied().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.steps.borrow().len()
    }
}

impl Calculator for ScriptedCalculator {
    fn calculate(
        &self,
        definition: &MacroDefinition,
        arguments: &[String],
        _context: &Context,
    ) -> Result<String, CalculatorError> {
        let Some((name, expected, result)) = self.steps.borrow_mut().pop_front() else {
            panic!("unexpected call #{}({arguments:?})", definition.name);
        };
        assert_eq!(
            (definition.name.as_str(), arguments.to_vec()),
            (name, expected.iter().map(|a| a.to_string()).collect::<Vec<_>>()),
        );
        Ok(result.to_string())
    }
}

pub fn registry(names: &[&str]) -> Registry {
    names
        .iter()
        .map(|name| MacroDefinition::new(*name, "rhai", ""))
        .collect()
}

pub fn scripted(steps: &[Step]) -> Evaluator<ScriptedCalculator> {
    Evaluator::new(registry(&MACRO_NAMES), ScriptedCalculator::new(steps))
}

/// Evaluates `input` and checks both the output and that every
/// expected call happened.
pub fn validate(input: &str, expected: &str, steps: &[Step]) {
    let evaluator = scripted(steps);
    let output = evaluator.evaluate(input, &Context::new());
    assert_eq!(output, Ok(expected.to_string()));
    assert_eq!(evaluator.calculator().remaining(), 0, "calls left unmade");
}

pub fn evaluate_error(input: &str, steps: &[Step]) -> EvalError {
    match scripted(steps).evaluate(input, &Context::new()) {
        Ok(output) => panic!("expected an error, got {output:?}"),
        Err(err) => err,
    }
}
