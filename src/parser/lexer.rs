//! Lexer for dialog scripts
//!
//! The lexer tokenizes a UTF-8 source string into a flat stream of tokens
//! with source positions. Tokenizing never fails on its own: an unrecognized
//! byte becomes an [`TokenType::Unknown`] token and an unterminated string
//! yields whatever was read before EOF. Both cases are rejected later, by
//! the parser, which is where the diagnostic actually surfaces.

use std::collections::HashMap;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Step,
    Speak,
    Listen,
    Branch,
    Set,
    End,

    Identifier,
    String,
    Number,

    LBrace,
    RBrace,
    Equals,
    Arrow,
    Eq,
    Ne,

    Newline,
    Eof,
    Unknown,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Step => "STEP",
            Self::Speak => "SPEAK",
            Self::Listen => "LISTEN",
            Self::Branch => "BRANCH",
            Self::Set => "SET",
            Self::End => "END",
            Self::Identifier => "IDENTIFIER",
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Equals => "=",
            Self::Arrow => "->",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Newline => "NEWLINE",
            Self::Eof => "EOF",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// A token produced by the lexer, carrying its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            token_type,
            value: value.into(),
            line,
            column,
        }
    }
}

lazy_static::lazy_static! {
    /// Keyword re-tagging table: an identifier whose lowercased text matches
    /// one of these is re-tagged as the corresponding keyword token.
    static ref KEYWORDS: HashMap<&'static str, TokenType> = {
        let mut m = HashMap::new();
        m.insert("step", TokenType::Step);
        m.insert("speak", TokenType::Speak);
        m.insert("listen", TokenType::Listen);
        m.insert("branch", TokenType::Branch);
        m.insert("set", TokenType::Set);
        m.insert("end", TokenType::End);
        m
    };
}

/// Tokenizes dialog script source into a stream terminated by `Eof`.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
            tokens: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), Some(' ') | Some('\t') | Some('\r')) {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.current_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_string(&mut self) -> String {
        let quote = self.current_char().expect("caller checked for quote");
        self.advance();

        let mut value = String::new();
        while let Some(c) = self.current_char() {
            if c == quote {
                break;
            }
            if c == '\\' {
                self.advance();
                match self.current_char() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('\\') => value.push('\\'),
                    Some(q) if q == quote => value.push(quote),
                    Some(other) => value.push(other),
                    None => break,
                }
                self.advance();
            } else {
                value.push(c);
                self.advance();
            }
        }

        if self.current_char() == Some(quote) {
            self.advance();
        }

        value
    }

    fn read_number(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() || c == '.' {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }
        value
    }

    fn read_identifier(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || c == '_' {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }
        value
    }

    /// Consumes `self` and produces the full token stream.
    pub fn tokenize(mut self) -> Vec<Token> {
        while self.pos < self.input.len() {
            self.skip_whitespace();

            let Some(c) = self.current_char() else {
                break;
            };

            if c == '#' {
                self.skip_comment();
                continue;
            }

            if c == '\n' {
                self.tokens.push(Token::new(TokenType::Newline, "\n", self.line, self.column));
                self.advance();
                continue;
            }

            let start_line = self.line;
            let start_column = self.column;

            if c == '"' || c == '\'' {
                let value = self.read_string();
                self.tokens.push(Token::new(TokenType::String, value, start_line, start_column));
                continue;
            }

            if c.is_ascii_digit() {
                let value = self.read_number();
                self.tokens.push(Token::new(TokenType::Number, value, start_line, start_column));
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                let value = self.read_identifier();
                let token_type = KEYWORDS
                    .get(value.to_ascii_lowercase().as_str())
                    .copied()
                    .unwrap_or(TokenType::Identifier);
                self.tokens.push(Token::new(token_type, value, start_line, start_column));
                continue;
            }

            match c {
                '{' => {
                    self.tokens.push(Token::new(TokenType::LBrace, "{", start_line, start_column));
                    self.advance();
                }
                '}' => {
                    self.tokens.push(Token::new(TokenType::RBrace, "}", start_line, start_column));
                    self.advance();
                }
                '=' => {
                    if self.peek_char(1) == Some('=') {
                        self.advance();
                        self.advance();
                        self.tokens.push(Token::new(TokenType::Eq, "==", start_line, start_column));
                    } else {
                        self.advance();
                        self.tokens.push(Token::new(TokenType::Equals, "=", start_line, start_column));
                    }
                }
                '!' => {
                    if self.peek_char(1) == Some('=') {
                        self.advance();
                        self.advance();
                        self.tokens.push(Token::new(TokenType::Ne, "!=", start_line, start_column));
                    } else {
                        self.advance();
                        self.tokens.push(Token::new(TokenType::Unknown, "!", start_line, start_column));
                    }
                }
                '-' if self.peek_char(1) == Some('>') => {
                    self.advance();
                    self.advance();
                    self.tokens.push(Token::new(TokenType::Arrow, "->", start_line, start_column));
                }
                other => {
                    self.advance();
                    self.tokens.push(Token::new(TokenType::Unknown, other.to_string(), start_line, start_column));
                }
            }
        }

        self.tokens.push(Token::new(TokenType::Eof, "", self.line, self.column));
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn tokenizes_keywords_case_insensitively() {
        let tokens = Lexer::new("STEP Step step").tokenize();
        assert_eq!(
            types(&tokens),
            vec![TokenType::Step, TokenType::Step, TokenType::Step, TokenType::Eof]
        );
    }

    #[test]
    fn tokenizes_a_full_step() {
        let source = "step start {\n  speak \"hi\"\n  end\n}";
        let tokens = Lexer::new(source).tokenize();
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Step,
                TokenType::Identifier,
                TokenType::LBrace,
                TokenType::Newline,
                TokenType::Speak,
                TokenType::String,
                TokenType::Newline,
                TokenType::End,
                TokenType::Newline,
                TokenType::RBrace,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes_are_decoded() {
        let tokens = Lexer::new(r#""a\nb\tc\\d\"e""#).tokenize();
        assert_eq!(tokens[0].value, "a\nb\tc\\d\"e");
    }

    #[test]
    fn unterminated_string_yields_partial_content() {
        let tokens = Lexer::new("\"abc").tokenize();
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].value, "abc");
    }

    #[test]
    fn comments_are_discarded_up_to_newline() {
        let tokens = Lexer::new("speak \"x\" # trailing comment\nend").tokenize();
        assert_eq!(types(&tokens), vec![
            TokenType::Speak,
            TokenType::String,
            TokenType::Newline,
            TokenType::End,
            TokenType::Eof,
        ]);
    }

    #[test]
    fn unknown_byte_is_flagged() {
        let tokens = Lexer::new("@").tokenize();
        assert_eq!(tokens[0].token_type, TokenType::Unknown);
        assert_eq!(tokens[0].value, "@");
    }

    #[test]
    fn multi_char_operators() {
        let tokens = Lexer::new("== != ->").tokenize();
        assert_eq!(types(&tokens), vec![TokenType::Eq, TokenType::Ne, TokenType::Arrow, TokenType::Eof]);
    }

    #[test]
    fn numbers_support_a_decimal_point() {
        let tokens = Lexer::new("42 3.14").tokenize();
        assert_eq!(tokens[0].value, "42");
        assert_eq!(tokens[1].value, "3.14");
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = Lexer::new("step a {\n}").tokenize();
        let lbrace = &tokens[2];
        assert_eq!(lbrace.line, 1);
        let rbrace = &tokens[4];
        assert_eq!(rbrace.line, 2);
    }

    #[test]
    fn token_literals_reconstruct_the_non_comment_source() {
        let source = "step start { # greet the caller\n  listen x\n  branch x == y -> b\n  end\n}";
        let tokens = Lexer::new(source).tokenize();

        let reconstructed: Vec<&str> = tokens
            .iter()
            .filter(|t| !matches!(t.token_type, TokenType::Newline | TokenType::Eof))
            .map(|t| t.value.as_str())
            .collect();

        let non_comment_source: String = source
            .lines()
            .map(|line| line.split('#').next().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ");
        let expected: Vec<&str> = non_comment_source.split_whitespace().collect();

        assert_eq!(reconstructed, expected);
    }
}
