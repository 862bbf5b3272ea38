//! Abstract Syntax Tree (AST) Types for dialog scripts
//!
//! This module defines the complete AST structure produced by the parser.
//! All nodes are plain value types; once a [`Script`] is built it is never
//! mutated again and can be shared across every concurrent session.

use std::collections::HashMap;
use std::fmt;

// =============================================================================
// VALUES
// =============================================================================

/// A variable value: the DSL only ever stores strings, integers or floats.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
}

impl Value {
    /// The string form used by both `${name}` interpolation and branch
    /// comparison, which is always string-based (see `Interpreter::execute_branch`).
    pub fn display_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    format!("{:.1}", f)
                } else {
                    f.to_string()
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_string())
    }
}

// =============================================================================
// SCRIPT & STEPS
// =============================================================================

/// Root node: a complete, immutable dialog script.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub steps: Vec<Step>,
    /// Case-sensitive name -> index into `steps`, built once at construction.
    step_index: HashMap<String, usize>,
}

impl Script {
    /// Builds the by-name step index. Callers (the parser) are responsible
    /// for having already rejected duplicate step names.
    pub fn new(steps: Vec<Step>) -> Self {
        let step_index = steps
            .iter()
            .enumerate()
            .map(|(i, step)| (step.name.clone(), i))
            .collect();
        Self { steps, step_index }
    }

    pub fn get_step(&self, name: &str) -> Option<&Step> {
        self.step_index.get(name).map(|&i| &self.steps[i])
    }

    pub fn has_step(&self, name: &str) -> bool {
        self.step_index.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A named block of statements, the smallest unit of control flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: String,
    pub statements: Vec<Statement>,
    pub line: usize,
}

/// Union of all statement kinds a step's body may contain.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Speak(SpeakStatement),
    Listen(ListenStatement),
    Branch(BranchStatement),
    Set(SetStatement),
    End(EndStatement),
}

impl Statement {
    pub fn line(&self) -> usize {
        match self {
            Statement::Speak(s) => s.line,
            Statement::Listen(s) => s.line,
            Statement::Branch(s) => s.line,
            Statement::Set(s) => s.line,
            Statement::End(s) => s.line,
        }
    }
}

/// `speak "message ${with} placeholders"`
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakStatement {
    pub message: String,
    pub line: usize,
}

/// `listen variable_name`
#[derive(Debug, Clone, PartialEq)]
pub struct ListenStatement {
    pub variable: String,
    pub line: usize,
}

/// The comparison operator in a `branch` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Ne => write!(f, "!="),
        }
    }
}

/// The right-hand operand of a branch condition, as written in the source.
/// Kept structurally (rather than re-parsed from a canonicalized string) so
/// literal-vs-identifier-vs-number is unambiguous at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A quoted string literal.
    Literal(String),
    /// A bare identifier: may name a variable, or fall back to a number or
    /// the identifier text itself (see `Interpreter::execute_branch`).
    Identifier(String),
    /// A bare numeric literal.
    Number(Value),
}

/// `branch var == operand -> target_step`
#[derive(Debug, Clone, PartialEq)]
pub struct BranchStatement {
    pub variable: String,
    pub op: CompareOp,
    pub operand: Operand,
    pub target_step: String,
    pub line: usize,
}

/// The right-hand side of a `set` statement, as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    Literal(Value),
    /// A bare identifier naming another variable, resolved at execution time.
    Identifier(String),
}

/// `set variable = value`
#[derive(Debug, Clone, PartialEq)]
pub struct SetStatement {
    pub variable: String,
    pub value: SetValue,
    pub line: usize,
}

/// `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndStatement {
    pub line: usize,
}
