//! Expression lexer
//!
//! Splits a condition or quantity string into tokens, each tagged with the
//! character position it starts at.

use crate::error::{ParseError, Result};

/// Expression token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Integer(i64),
    Float(f64),
    Str(String),
    Ident(String),
    True,
    False,
    And,
    Or,
    Not,
    If,
    Else,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
    Eof,
}

impl Token {
    /// Human readable form for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Integer(n) => format!("number {}", n),
            Token::Float(x) => format!("number {}", x),
            Token::Str(s) => format!("string \"{}\"", s),
            Token::Ident(name) => format!("name '{}'", name),
            Token::True => "'True'".to_string(),
            Token::False => "'False'".to_string(),
            Token::And => "'and'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::Not => "'not'".to_string(),
            Token::If => "'if'".to_string(),
            Token::Else => "'else'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Percent => "'%'".to_string(),
            Token::EqEq => "'=='".to_string(),
            Token::NotEq => "'!='".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Le => "'<='".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::Ge => "'>='".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// A token and the character position it starts at
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: usize,
}

/// Expression lexer
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>> {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Result<SpannedToken> {
        self.skip_whitespace();
        let position = self.pos;

        let Some(c) = self.peek() else {
            return Ok(SpannedToken {
                token: Token::Eof,
                position,
            });
        };

        let token = match c {
            '0'..='9' => self.number()?,
            '.' if self.peek_at(1).map_or(false, |d| d.is_ascii_digit()) => self.number()?,
            '"' | '\'' => self.string(c)?,
            c if c.is_alphabetic() || c == '_' => self.word(),
            _ => self.symbol(c)?,
        };

        Ok(SpannedToken { token, position })
    }

    fn symbol(&mut self, c: char) -> Result<Token> {
        let next = self.peek_at(1);
        let (token, width) = match (c, next) {
            ('=', Some('=')) => (Token::EqEq, 2),
            ('!', Some('=')) => (Token::NotEq, 2),
            ('<', Some('=')) => (Token::Le, 2),
            ('>', Some('=')) => (Token::Ge, 2),
            ('&', Some('&')) => (Token::And, 2),
            ('|', Some('|')) => (Token::Or, 2),
            ('<', _) => (Token::Lt, 1),
            ('>', _) => (Token::Gt, 1),
            ('!', _) => (Token::Not, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            ('=', _) => {
                return Err(ParseError::invalid_expression(
                    "Unexpected '=' (use '==' to compare)",
                    self.pos,
                ))
            }
            (other, _) => {
                return Err(ParseError::invalid_expression(
                    format!("Unexpected character '{}'", other),
                    self.pos,
                ))
            }
        };
        self.pos += width;
        Ok(token)
    }

    fn number(&mut self) -> Result<Token> {
        let start = self.pos;
        let mut is_float = false;

        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some('+') | Some('-')));
            if self.peek_at(1 + sign).map_or(false, |c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += 1 + sign;
                while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| ParseError::invalid_expression(format!("Invalid number '{}'", text), start))
        } else {
            text.parse::<i64>().map(Token::Integer).map_err(|_| {
                ParseError::invalid_expression(format!("Integer literal '{}' is out of range", text), start)
            })
        }
    }

    fn string(&mut self, quote: char) -> Result<Token> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();

        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::invalid_expression("Unterminated string literal", start))
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(Token::Str(value));
                }
                Some('\\') => {
                    let escaped = match self.peek_at(1) {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some(other) => {
                            return Err(ParseError::invalid_expression(
                                format!("Unknown escape sequence '\\{}'", other),
                                self.pos,
                            ))
                        }
                        None => {
                            return Err(ParseError::invalid_expression(
                                "Unterminated string literal",
                                start,
                            ))
                        }
                    };
                    value.push(escaped);
                    self.pos += 2;
                }
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn word(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" | "true" => Token::True,
            "False" | "false" => Token::False,
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "if" => Token::If,
            "else" => Token::Else,
            _ => Token::Ident(word),
        }
    }
}
