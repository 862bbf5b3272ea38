//! Tree-walking interpreter for dialog scripts.
//!
//! `execute` drives a session's script forward from wherever it last
//! paused until the next `listen` blocks it, an `end` is reached, or an
//! error stops it. There is no coroutine or generator underneath: the pair
//! `(current_step, statement_index)` stored on the [`ExecutionContext`] is
//! the entire continuation, so resuming is just calling `execute` again
//! after new input has been queued.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::ast::types::{ListenStatement, SetStatement, SetValue, Statement, Step, Value};
use crate::classifier::{IntentClassifier, IntentResult};
use crate::interpreter::condition;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::intent_gate::should_recognize_intent;
use crate::interpreter::types::{ExecutionLimits, InterpretResult};
use crate::runtime::context::ExecutionContext;
use crate::Script;

lazy_static! {
    static ref VARIABLE_PATTERN: Regex = Regex::new(r"\$\{(\w+)\}").unwrap();
}

/// Internal signal returned by a single pass over a step's statements.
enum StepSignal {
    Branch(String),
    WaitingInput { variable: String, message: String },
    Finished { message: String },
}

enum ListenOutcome {
    Waiting,
    Received,
}

pub struct Interpreter {
    script: Script,
    classifier: Option<Arc<dyn IntentClassifier>>,
    limits: ExecutionLimits,
    /// Labels handed to the classifier alongside every input, so it can bias
    /// toward intents this script actually branches on.
    candidate_intents: Vec<String>,
}

impl Interpreter {
    pub fn new(script: Script) -> Self {
        Self { script, classifier: None, limits: ExecutionLimits::default(), candidate_intents: Vec::new() }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_limits(mut self, limits: ExecutionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_candidate_intents(mut self, candidate_intents: Vec<String>) -> Self {
        self.candidate_intents = candidate_intents;
        self
    }

    /// Advances `context` until the next pause point. Safe to call again
    /// after queuing more input with [`ExecutionContext::set_pending_input`].
    pub fn execute(&self, context: &ExecutionContext) -> InterpretResult {
        if self.script.is_empty() {
            let err = InterpreterError::EmptyScript;
            return InterpretResult::error(err.to_string(), err.token());
        }

        if context.get_current_step().is_none() {
            let start_step = if self.script.has_step("start") {
                "start".to_string()
            } else {
                self.script.steps[0].name.clone()
            };
            context.set_current_step(start_step);
            context.set_statement_index(0);
        }

        let mut depth: u32 = 0;
        loop {
            if depth >= self.limits.max_recursion_depth {
                let start_step = context.get_current_step().unwrap_or_default();
                let err = InterpreterError::RecursionLimitExceeded {
                    limit: self.limits.max_recursion_depth,
                    start_step,
                };
                return InterpretResult::error(err.to_string(), err.token());
            }

            let Some(step_name) = context.get_current_step() else {
                let err = InterpreterError::NoCurrentStep(context.session_id().to_string());
                return InterpretResult::error(err.to_string(), err.token());
            };
            let step = match self.script.get_step(&step_name) {
                Some(step) => step,
                None => {
                    let err = InterpreterError::UnknownStep(step_name);
                    return InterpretResult::error(err.to_string(), err.token());
                }
            };

            match self.execute_step(step, context) {
                StepSignal::Branch(target) => {
                    context.set_current_step(target);
                    context.set_statement_index(0);
                    depth += 1;
                }
                StepSignal::WaitingInput { variable, message } => {
                    return InterpretResult::waiting_input(message, variable);
                }
                StepSignal::Finished { message } => {
                    context.set_statement_index(0);
                    return InterpretResult::finished(message);
                }
            }
        }
    }

    fn execute_step(&self, step: &Step, context: &ExecutionContext) -> StepSignal {
        let start_index = context.get_statement_index();
        let mut messages: Vec<String> = Vec::new();

        for (index, statement) in step.statements.iter().enumerate() {
            if index < start_index {
                continue;
            }

            match statement {
                Statement::Speak(speak) => {
                    messages.push(substitute_variables(&speak.message, context));
                }
                Statement::Listen(listen) => {
                    if let ListenOutcome::Waiting = self.execute_listen(listen, context) {
                        context.set_statement_index(index);
                        let waiting_message = "waiting for input".to_string();
                        let message = if messages.is_empty() {
                            waiting_message
                        } else {
                            format!("{}\n{}", messages.join("\n"), waiting_message)
                        };
                        return StepSignal::WaitingInput { variable: listen.variable.clone(), message };
                    }
                }
                Statement::Branch(branch) => {
                    if condition::evaluate(branch, context) {
                        return StepSignal::Branch(branch.target_step.clone());
                    }
                }
                Statement::Set(set) => {
                    execute_set(set, context);
                }
                Statement::End(_) => {
                    return StepSignal::Finished { message: messages.join("\n") };
                }
            }
        }

        context.set_statement_index(0);
        StepSignal::Finished { message: messages.join("\n") }
    }

    fn execute_listen(&self, listen: &ListenStatement, context: &ExecutionContext) -> ListenOutcome {
        let Some(user_input) = context.get_and_consume_input() else {
            return ListenOutcome::Waiting;
        };
        if user_input.trim().is_empty() {
            return ListenOutcome::Waiting;
        }

        context.set_variable(&listen.variable, Value::String(user_input.clone()));

        let needs_intent = should_recognize_intent(&listen.variable, &user_input);

        match (needs_intent, self.classifier.as_ref()) {
            (true, Some(classifier)) => match classify_blocking(classifier.as_ref(), &user_input, &self.candidate_intents) {
                Ok(result) => apply_intent_result(context, result),
                Err(_) if context.get_variable("user_intent").is_none() => {
                    context.set_variable("user_intent", Value::String("unknown".to_string()));
                }
                Err(_) => {}
            },
            _ if context.get_variable("user_intent").is_none() => {
                context.set_variable("user_intent", Value::String("unknown".to_string()));
            }
            _ => {}
        }

        ListenOutcome::Received
    }
}

fn apply_intent_result(context: &ExecutionContext, result: IntentResult) {
    context.set_variable("intent", Value::String(result.intent.clone()));
    context.set_variable("confidence", Value::Float(result.confidence));
    for (key, value) in result.extras {
        context.set_variable(key, value);
    }
    context.set_variable("user_intent", Value::String(result.intent));
}

/// Bridges a call into an async classifier from this otherwise synchronous
/// step driver, the same way the host bash interpreter bridges into its
/// async filesystem from a synchronous execution engine.
fn classify_blocking(
    classifier: &dyn IntentClassifier,
    input: &str,
    candidate_intents: &[String],
) -> Result<IntentResult, crate::classifier::ClassifierError> {
    let candidates = if candidate_intents.is_empty() { None } else { Some(candidate_intents) };
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(classifier.classify(input, candidates)))
}

fn execute_set(set: &SetStatement, context: &ExecutionContext) {
    let value = match &set.value {
        SetValue::Literal(v) => v.clone(),
        SetValue::Identifier(name) => context.get_variable(name).unwrap_or_else(|| Value::String(name.clone())),
    };
    context.set_variable(&set.variable, value);
}

fn substitute_variables(text: &str, context: &ExecutionContext) -> String {
    VARIABLE_PATTERN
        .replace_all(text, |caps: &regex_lite::Captures| {
            let name = &caps[1];
            match context.get_variable(name) {
                Some(value) => value.display_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn interpreter_for(source: &str) -> Interpreter {
        Interpreter::new(parse(source).unwrap())
    }

    #[test]
    fn empty_script_is_an_error() {
        let interpreter = Interpreter::new(crate::Script::new(Vec::new()));
        let context = ExecutionContext::new("u1");
        let result = interpreter.execute(&context);
        assert_eq!(result.status, crate::interpreter::types::ExecStatus::Error);
        assert_eq!(result.error.as_deref(), Some("EmptyScript"));
    }

    #[test]
    fn hello_end_finishes_immediately() {
        let interpreter = interpreter_for(r#"step start { speak "hi" end }"#);
        let context = ExecutionContext::new("u1");
        let result = interpreter.execute(&context);
        assert_eq!(result.status, crate::interpreter::types::ExecStatus::Finished);
        assert_eq!(result.message, "hi");
    }

    #[test]
    fn echo_once_round_trips_a_variable() {
        let interpreter = interpreter_for(
            r#"step start { speak "name?" listen name speak "hello ${name}" end }"#,
        );
        let context = ExecutionContext::new("u1");

        let first = interpreter.execute(&context);
        assert_eq!(first.status, crate::interpreter::types::ExecStatus::WaitingInput);
        assert!(first.message.contains("name?"));

        context.set_pending_input("Ada");
        let second = interpreter.execute(&context);
        assert_eq!(second.status, crate::interpreter::types::ExecStatus::Finished);
        assert!(second.message.contains("hello Ada"));
    }

    #[test]
    fn branch_true_jumps_and_drops_prior_messages() {
        let interpreter = interpreter_for(
            r#"
            step start {
                listen x
                branch x == "go" -> b
                speak "stay"
                end
            }
            step b {
                speak "jumped"
                end
            }
            "#,
        );
        let context = ExecutionContext::new("u1");
        interpreter.execute(&context);
        context.set_pending_input("go");
        let result = interpreter.execute(&context);
        assert_eq!(result.message, "jumped");
    }

    #[test]
    fn branch_false_falls_through() {
        let interpreter = interpreter_for(
            r#"
            step start {
                listen x
                branch x == "go" -> b
                speak "stay"
                end
            }
            step b {
                speak "jumped"
                end
            }
            "#,
        );
        let context = ExecutionContext::new("u1");
        interpreter.execute(&context);
        context.set_pending_input("no");
        let result = interpreter.execute(&context);
        assert_eq!(result.message, "stay");
    }

    #[test]
    fn recursion_bound_is_enforced_on_cyclic_branches() {
        let interpreter = Interpreter::new(
            parse(
                r#"
                step a {
                    branch x == "None" -> b
                    end
                }
                step b {
                    branch x == "None" -> a
                    end
                }
                "#,
            )
            .unwrap(),
        )
        .with_limits(ExecutionLimits { max_recursion_depth: 10 });
        let context = ExecutionContext::new("u1");
        let result = interpreter.execute(&context);
        assert_eq!(result.status, crate::interpreter::types::ExecStatus::Error);
        assert!(result.message.contains("recursion"));
    }

    #[test]
    fn variable_substitution_leaves_unknown_placeholders_intact() {
        let interpreter = interpreter_for(r#"step start { speak "x${missing}y" end }"#);
        let context = ExecutionContext::new("u1");
        let result = interpreter.execute(&context);
        assert_eq!(result.message, "x${missing}y");
    }

    #[test]
    fn set_statement_can_alias_another_variable() {
        let interpreter = interpreter_for(
            r#"
            step start {
                set count = 10
                set alias = count
                speak "${alias}"
                end
            }
            "#,
        );
        let context = ExecutionContext::new("u1");
        let result = interpreter.execute(&context);
        assert_eq!(result.message, "10");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn two_sessions_keep_independent_variables() {
        let interpreter = Arc::new(interpreter_for(
            r#"step start { speak "name?" listen name speak "hello ${name}" end }"#,
        ));

        let ctx_a = Arc::new(ExecutionContext::new("a"));
        let ctx_b = Arc::new(ExecutionContext::new("b"));

        interpreter.execute(&ctx_a);
        interpreter.execute(&ctx_b);
        ctx_a.set_pending_input("Ada");
        ctx_b.set_pending_input("Bo");

        let result_a = interpreter.execute(&ctx_a);
        let result_b = interpreter.execute(&ctx_b);

        assert!(result_a.message.contains("hello Ada"));
        assert!(result_b.message.contains("hello Bo"));
    }
}
