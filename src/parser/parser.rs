use crate::lexer::{SourceLocation, Token, TokenKind};

use super::{AstKind, AstNode, Block, OpKind, ParseError, Program, Summary};

pub struct Parser<'a> {
    tokens: std::slice::Iter<'a, Token>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Parser<'a> {
        Parser {
            tokens: tokens.iter(),
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        self.parse_block(None)
    }

    /// `open` is the location of the `[` that started this block, `None` at
    /// the top level.
    fn parse_block(&mut self, open: Option<SourceLocation>) -> Result<Block, ParseError> {
        let mut instructions = vec![];
        let mut summary = Summary::default();
        // running offset within the current straight-line segment
        let mut p: isize = 0;

        while let Some(token) = self.tokens.next() {
            let kind = match token.kind {
                TokenKind::Increment => {
                    p += 1;
                    summary.max_ptr = summary.max_ptr.max(p);
                    summary.net_move = summary.net_move.map(|n| n + 1);
                    summary.has_addptr = true;
                    AstKind::Op(OpKind::Increment)
                }
                TokenKind::Decrement => {
                    p -= 1;
                    summary.min_ptr = summary.min_ptr.min(p);
                    summary.net_move = summary.net_move.map(|n| n - 1);
                    summary.has_addptr = true;
                    AstKind::Op(OpKind::Decrement)
                }
                TokenKind::DerefIncrement => {
                    summary.has_add = true;
                    AstKind::Op(OpKind::DerefIncrement)
                }
                TokenKind::DerefDecrement => {
                    summary.has_add = true;
                    AstKind::Op(OpKind::DerefDecrement)
                }
                TokenKind::Write => {
                    summary.has_io = true;
                    AstKind::Op(OpKind::Write)
                }
                TokenKind::Read => {
                    summary.has_io = true;
                    AstKind::Op(OpKind::Read)
                }
                TokenKind::JumpStart => {
                    let inner = self.parse_block(Some(token.loc))?;

                    summary.has_nested_loops = true;
                    summary.has_io |= inner.summary.has_io;
                    summary.has_add |= inner.summary.has_add;
                    summary.has_addptr |= inner.summary.has_addptr;
                    if inner.summary.net_move != Some(0) {
                        summary.net_move = None;
                    }
                    // the nested loop's delta is captured in its own summary
                    p = 0;

                    AstKind::Loop(inner)
                }
                TokenKind::JumpEnd => {
                    return if open.is_some() {
                        Ok(Block {
                            instructions,
                            summary,
                        })
                    } else {
                        Err(ParseError::UnmatchedRightBracket(token.loc))
                    };
                }
            };

            instructions.push(AstNode {
                kind,
                loc: token.loc,
            });
        }

        match open {
            Some(loc) => Err(ParseError::UnmatchedLeftBracket(loc)),
            None => Ok(Block {
                instructions,
                summary,
            }),
        }
    }
}
