use super::{SourceLocation, Token, TokenKind};

/// Filters the source down to the eight significant characters, attaching a
/// line/column to each. Everything else is a comment and is skipped (while
/// still advancing the column).
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    cur_line: u32,
    cur_col: u32,

    bytes: std::slice::Iter<'a, u8>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            cur_line: 1,
            cur_col: 1,

            bytes: source.as_bytes().iter(),
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let byte = *self.bytes.next()?;
            let loc = SourceLocation {
                line: self.cur_line,
                col: self.cur_col,
            };

            if byte == b'\n' {
                self.cur_line += 1;
                self.cur_col = 1;
                continue;
            }
            self.cur_col += 1;

            let kind = match byte {
                b'>' => TokenKind::Increment,
                b'<' => TokenKind::Decrement,
                b'+' => TokenKind::DerefIncrement,
                b'-' => TokenKind::DerefDecrement,
                b'.' => TokenKind::Write,
                b',' => TokenKind::Read,
                b'[' => TokenKind::JumpStart,
                b']' => TokenKind::JumpEnd,
                // every other byte is a comment
                _ => continue,
            };

            return Some(Token { kind, loc });
        }
    }

    pub fn collect_tokens(mut self) -> Vec<Token> {
        let mut tokens = vec![];
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}
