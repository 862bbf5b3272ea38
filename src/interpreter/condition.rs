//! Evaluation of `branch` conditions.
//!
//! Comparison is always done on the canonical string form of both sides,
//! matching the DSL's loose typing: `1 == "1"` and `1 == 1.0` both hold.

use crate::ast::types::{BranchStatement, CompareOp, Operand, Value};
use crate::runtime::context::ExecutionContext;

/// The string form of an absent variable: `str(None)` in the original
/// interpreter, not the empty string.
const ABSENT: &str = "None";

/// Resolves the right-hand side of a branch condition to its comparison string.
fn resolve_operand(operand: &Operand, context: &ExecutionContext) -> String {
    match operand {
        Operand::Literal(s) => s.clone(),
        Operand::Number(v) => v.display_string(),
        Operand::Identifier(name) => match context.get_variable(name) {
            Some(value) => value.display_string(),
            None => name.clone(),
        },
    }
}

/// Evaluates whether `branch`'s condition holds against the current context.
pub fn evaluate(branch: &BranchStatement, context: &ExecutionContext) -> bool {
    let left = context
        .get_variable(&branch.variable)
        .map(|v| v.display_string())
        .unwrap_or_else(|| ABSENT.to_string());
    let right = resolve_operand(&branch.operand, context);

    match branch.op {
        CompareOp::Eq => left == right,
        CompareOp::Ne => left != right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(op: CompareOp, operand: Operand) -> BranchStatement {
        BranchStatement {
            variable: "x".to_string(),
            op,
            operand,
            target_step: "next".to_string(),
            line: 1,
        }
    }

    #[test]
    fn literal_equality() {
        let ctx = ExecutionContext::new("s1");
        ctx.set_variable("x", Value::String("go".to_string()));
        assert!(evaluate(&branch(CompareOp::Eq, Operand::Literal("go".to_string())), &ctx));
        assert!(!evaluate(&branch(CompareOp::Eq, Operand::Literal("stop".to_string())), &ctx));
    }

    #[test]
    fn not_equal() {
        let ctx = ExecutionContext::new("s1");
        ctx.set_variable("x", Value::String("go".to_string()));
        assert!(evaluate(&branch(CompareOp::Ne, Operand::Literal("stop".to_string())), &ctx));
    }

    #[test]
    fn numeric_and_string_forms_compare_equal() {
        let ctx = ExecutionContext::new("s1");
        ctx.set_variable("x", Value::Int(1));
        assert!(evaluate(&branch(CompareOp::Eq, Operand::Literal("1".to_string())), &ctx));
    }

    #[test]
    fn identifier_operand_resolves_another_variable() {
        let ctx = ExecutionContext::new("s1");
        ctx.set_variable("x", Value::String("5".to_string()));
        ctx.set_variable("y", Value::Int(5));
        assert!(evaluate(&branch(CompareOp::Eq, Operand::Identifier("y".to_string())), &ctx));
    }

    #[test]
    fn unset_variable_compares_as_the_literal_none() {
        let ctx = ExecutionContext::new("s1");
        assert!(evaluate(&branch(CompareOp::Eq, Operand::Literal("None".to_string())), &ctx));
        assert!(!evaluate(&branch(CompareOp::Eq, Operand::Literal("".to_string())), &ctx));
    }
}
