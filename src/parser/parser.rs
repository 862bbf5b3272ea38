//! Recursive descent parser for dialog scripts
//!
//! Consumes the lexer's token stream and produces an immutable [`Script`].
//! One token of lookahead; newlines are skipped between statements.
//!
//! Grammar:
//!   script    := step*
//!   step      := 'step' IDENT '{' statement* '}'
//!   statement := speak | listen | branch | set | end
//!   speak     := 'speak' STRING
//!   listen    := 'listen' IDENT
//!   branch    := 'branch' IDENT (EQ|NE) operand '->' IDENT
//!   operand   := STRING | IDENT | NUMBER
//!   set       := 'set' IDENT '=' (STRING | NUMBER | IDENT)
//!   end       := 'end'

use crate::ast::types::{
    BranchStatement, CompareOp, EndStatement, ListenStatement, Operand, Script, SetStatement,
    SetValue, SpeakStatement, Statement, Step, Value,
};
use crate::parser::lexer::{Lexer, Token, TokenType};
use crate::parser::types::ParseException;

/// Parses a complete dialog script from source text.
pub fn parse(source: &str) -> Result<Script, ParseException> {
    let tokens = Lexer::new(source).tokenize();
    Parser::new(tokens).parse_script()
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0 }
    }

    fn current(&self) -> &Token {
        // `tokenize` always appends an Eof token, so this never walks off the end.
        self.tokens.get(self.position).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn skip_newlines(&mut self) {
        while self.current().token_type == TokenType::Newline {
            self.advance();
        }
    }

    fn expect(&mut self, expected: TokenType, message: &str) -> Result<Token, ParseException> {
        if self.current().token_type == expected {
            Ok(self.advance())
        } else {
            Err(ParseException::at_token(message.to_string(), self.current()))
        }
    }

    pub fn parse_script(&mut self) -> Result<Script, ParseException> {
        self.skip_newlines();

        let mut steps: Vec<Step> = Vec::new();
        while self.current().token_type != TokenType::Eof {
            if self.current().token_type == TokenType::Step {
                let step = self.parse_step()?;
                if steps.iter().any(|s| s.name == step.name) {
                    return Err(ParseException::new(
                        format!("duplicate step name '{}'", step.name),
                        step.line,
                        0,
                    ));
                }
                steps.push(step);
            } else {
                return Err(ParseException::at_token(
                    format!("unexpected token: {}", self.current().token_type.as_str()),
                    self.current(),
                ));
            }
            self.skip_newlines();
        }

        let script = Script::new(steps);
        validate_branch_targets(&script)?;
        Ok(script)
    }

    fn parse_step(&mut self) -> Result<Step, ParseException> {
        let step_token = self.expect(TokenType::Step, "expected 'step' keyword")?;
        let line = step_token.line;

        let name_token = self.expect(TokenType::Identifier, "expected step name")?;
        let name = name_token.value;

        self.skip_newlines();
        self.expect(TokenType::LBrace, "expected '{' after step name")?;
        self.skip_newlines();

        let mut statements: Vec<Statement> = Vec::new();
        while self.current().token_type != TokenType::RBrace {
            self.skip_newlines();
            if self.current().token_type == TokenType::RBrace {
                break;
            }
            let statement = match self.current().token_type {
                TokenType::Speak => Statement::Speak(self.parse_speak()?),
                TokenType::Listen => Statement::Listen(self.parse_listen()?),
                TokenType::Branch => Statement::Branch(self.parse_branch()?),
                TokenType::Set => Statement::Set(self.parse_set()?),
                TokenType::End => Statement::End(self.parse_end()?),
                _ => {
                    return Err(ParseException::at_token(
                        format!("unexpected statement: {}", self.current().token_type.as_str()),
                        self.current(),
                    ));
                }
            };
            statements.push(statement);
            self.skip_newlines();
        }

        self.expect(TokenType::RBrace, "expected '}' to close step")?;

        Ok(Step { name, statements, line })
    }

    fn parse_speak(&mut self) -> Result<SpeakStatement, ParseException> {
        let token = self.expect(TokenType::Speak, "expected 'speak' keyword")?;
        let string_token = self.expect(TokenType::String, "expected string after 'speak'")?;
        Ok(SpeakStatement {
            message: string_token.value,
            line: token.line,
        })
    }

    fn parse_listen(&mut self) -> Result<ListenStatement, ParseException> {
        let token = self.expect(TokenType::Listen, "expected 'listen' keyword")?;
        let var_token = self.expect(TokenType::Identifier, "expected variable name after 'listen'")?;
        Ok(ListenStatement {
            variable: var_token.value,
            line: token.line,
        })
    }

    fn parse_branch(&mut self) -> Result<BranchStatement, ParseException> {
        let token = self.expect(TokenType::Branch, "expected 'branch' keyword")?;

        let left_token = self.expect(TokenType::Identifier, "expected variable name in branch condition")?;

        let op = match self.current().token_type {
            TokenType::Eq => {
                self.advance();
                CompareOp::Eq
            }
            TokenType::Ne => {
                self.advance();
                CompareOp::Ne
            }
            _ => {
                return Err(ParseException::at_token(
                    "expected '==' or '!=' in branch condition".to_string(),
                    self.current(),
                ));
            }
        };

        let operand = match self.current().token_type {
            TokenType::String => Operand::Literal(self.advance().value),
            TokenType::Identifier => Operand::Identifier(self.advance().value),
            TokenType::Number => Operand::Number(parse_number(self.advance().value)),
            _ => {
                return Err(ParseException::at_token(
                    "expected value in branch condition".to_string(),
                    self.current(),
                ));
            }
        };

        self.expect(TokenType::Arrow, "expected '->' after branch condition")?;
        let target_token = self.expect(TokenType::Identifier, "expected target step name after '->'")?;

        Ok(BranchStatement {
            variable: left_token.value,
            op,
            operand,
            target_step: target_token.value,
            line: token.line,
        })
    }

    fn parse_set(&mut self) -> Result<SetStatement, ParseException> {
        let token = self.expect(TokenType::Set, "expected 'set' keyword")?;
        let var_token = self.expect(TokenType::Identifier, "expected variable name after 'set'")?;
        self.expect(TokenType::Equals, "expected '=' after variable name")?;

        let value = match self.current().token_type {
            TokenType::String => SetValue::Literal(Value::String(self.advance().value)),
            TokenType::Number => SetValue::Literal(parse_number(self.advance().value)),
            TokenType::Identifier => SetValue::Identifier(self.advance().value),
            _ => {
                return Err(ParseException::at_token(
                    format!("unexpected value type: {}", self.current().token_type.as_str()),
                    self.current(),
                ));
            }
        };

        Ok(SetStatement {
            variable: var_token.value,
            value,
            line: token.line,
        })
    }

    fn parse_end(&mut self) -> Result<EndStatement, ParseException> {
        let token = self.expect(TokenType::End, "expected 'end' keyword")?;
        Ok(EndStatement { line: token.line })
    }
}

/// NUMBER containing '.' is a float, otherwise an integer; either form that
/// fails to parse (shouldn't happen given the lexer's own digit/dot rule)
/// falls back to the raw text as a string.
fn parse_number(raw: String) -> Value {
    if raw.contains('.') {
        match raw.parse::<f64>() {
            Ok(f) => Value::Float(f),
            Err(_) => Value::String(raw),
        }
    } else {
        match raw.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => Value::String(raw),
        }
    }
}

/// Every branch's target must name an existing step. Checked once, after the
/// whole script is parsed, so forward references are legal.
fn validate_branch_targets(script: &Script) -> Result<(), ParseException> {
    for step in &script.steps {
        for statement in &step.statements {
            if let Statement::Branch(branch) = statement {
                if !script.has_step(&branch.target_step) {
                    return Err(ParseException::new(
                        format!("branch target step '{}' does not exist", branch.target_step),
                        branch.line,
                        0,
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hello_end() {
        let script = parse(r#"step start { speak "hi" end }"#).unwrap();
        assert_eq!(script.steps.len(), 1);
        assert_eq!(script.steps[0].name, "start");
        assert_eq!(script.steps[0].statements.len(), 2);
    }

    #[test]
    fn parses_listen_and_branch() {
        let source = r#"
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
        "#;
        let script = parse(source).unwrap();
        assert_eq!(script.steps.len(), 2);
        assert!(script.has_step("b"));
    }

    #[test]
    fn rejects_duplicate_step_names() {
        let source = r#"
            step start { end }
            step start { end }
        "#;
        let err = parse(source).unwrap_err();
        assert!(err.message.contains("duplicate step name"));
    }

    #[test]
    fn rejects_unknown_branch_target() {
        let source = r#"
            step start {
                listen x
                branch x == "go" -> nowhere
                end
            }
        "#;
        let err = parse(source).unwrap_err();
        assert!(err.message.contains("does not exist"));
    }

    #[test]
    fn forward_branch_reference_is_legal() {
        let source = r#"
            step start {
                branch x == "go" -> later
                end
            }
            step later {
                end
            }
        "#;
        assert!(parse(source).is_ok());
    }

    #[test]
    fn missing_brace_is_a_parse_error() {
        let err = parse("step start speak \"hi\" end }").unwrap_err();
        assert!(err.message.contains("'{'"));
    }

    #[test]
    fn missing_arrow_in_branch_is_a_parse_error() {
        let err = parse(r#"step start { listen x branch x == "go" b end }"#).unwrap_err();
        assert!(err.message.contains("'->'"));
    }

    #[test]
    fn set_parses_float_and_int_and_identifier() {
        let source = r#"
            step start {
                set count = 10
                set ratio = 3.5
                set alias = count
                end
            }
        "#;
        let script = parse(source).unwrap();
        let Statement::Set(s0) = &script.steps[0].statements[0] else { panic!() };
        assert_eq!(s0.value, SetValue::Literal(Value::Int(10)));
        let Statement::Set(s1) = &script.steps[0].statements[1] else { panic!() };
        assert_eq!(s1.value, SetValue::Literal(Value::Float(3.5)));
        let Statement::Set(s2) = &script.steps[0].statements[2] else { panic!() };
        assert_eq!(s2.value, SetValue::Identifier("count".to_string()));
    }
}
