//! Map file lexer.
//!
//! Tokenizes Quake-style `.map` text. Handles:
//! - Braces around entities and brushes
//! - Parentheses around plane points
//! - Quoted strings (entity keys and values), with `\"` and `\\` escapes
//! - Bare words (numbers, shader names)
//! - `//` line comments

use crate::error::MapError;

/// A token in a map file.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Left brace `{`.
    LBrace,
    /// Right brace `}`.
    RBrace,
    /// Left parenthesis `(`.
    LParen,
    /// Right parenthesis `)`.
    RParen,
    /// Quoted string (contents without quotes).
    Quoted(String),
    /// Any other run of non-blank characters.
    Word(String),
}

/// Position in the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

/// A token with its position in the source.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Position where the token starts.
    pub pos: Position,
}

/// Lexer for `.map` files.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>, MapError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    /// Get the next token, or `None` if at end of input.
    pub fn next_token(&mut self) -> Result<Option<SpannedToken>, MapError> {
        self.skip_whitespace_and_comments();

        let Some(ch) = self.peek_char() else {
            return Ok(None);
        };
        let start_pos = Position {
            line: self.line,
            col: self.col,
        };

        let token = match ch {
            b'{' => {
                self.advance();
                Token::LBrace
            }
            b'}' => {
                self.advance();
                Token::RBrace
            }
            b'(' => {
                self.advance();
                Token::LParen
            }
            b')' => {
                self.advance();
                Token::RParen
            }
            b'"' => self.read_quoted()?,
            _ => self.read_word(),
        };

        Ok(Some(SpannedToken {
            token,
            pos: start_pos,
        }))
    }

    fn peek_char(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn at_comment(&self) -> bool {
        self.input.get(self.pos) == Some(&b'/') && self.input.get(self.pos + 1) == Some(&b'/')
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while let Some(ch) = self.peek_char() {
                if ch.is_ascii_whitespace() {
                    self.advance();
                } else {
                    break;
                }
            }

            if self.at_comment() {
                while let Some(ch) = self.peek_char() {
                    if ch == b'\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    fn read_quoted(&mut self) -> Result<Token, MapError> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance(); // opening quote

        let mut content = Vec::new();
        loop {
            match self.advance() {
                None => {
                    return Err(MapError::lexer(start_line, start_col, "unterminated string"));
                }
                Some(b'"') => break,
                Some(b'\\') if matches!(self.peek_char(), Some(b'"' | b'\\')) => {
                    if let Some(ch) = self.advance() {
                        content.push(ch);
                    }
                }
                Some(ch) => content.push(ch),
            }
        }

        Ok(Token::Quoted(String::from_utf8_lossy(&content).into_owned()))
    }

    fn read_word(&mut self) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_whitespace() || matches!(ch, b'{' | b'}' | b'(' | b')' | b'"') {
                break;
            }
            self.advance();
        }
        Token::Word(String::from_utf8_lossy(&self.input[start..self.pos]).into_owned())
    }
}
