use super::ast::{BinaryOp, Expr, ExprError};
use super::lexer::{Token, TokenKind};

/// Deepest `!` or parenthesis nesting accepted in one condition. Chains of
/// binary operators do not count towards it.
pub const MAX_DEPTH: usize = 256;

static END_OF_LINE: Token = Token {
    kind: TokenKind::EndOfLine,
    start: 0,
};

pub(super) struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    pub(super) fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub(super) fn parse_condition(&mut self) -> Result<Expr, ExprError> {
        if matches!(self.current().kind, TokenKind::EndOfLine) {
            return Err(ExprError::Empty);
        }
        let expr = self.parse_expr()?;
        self.expect_end()?;
        Ok(expr)
    }

    fn current(&self) -> &'t Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&END_OF_LINE)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect_end(&self) -> Result<(), ExprError> {
        let token = self.current();
        match token.kind {
            TokenKind::EndOfLine => Ok(()),
            ref other => Err(ExprError::TrailingTokens {
                found: other.to_string(),
                offset: token.start,
            }),
        }
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        if self.depth == MAX_DEPTH {
            return Err(ExprError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        Ok(())
    }

    /// `expr := unary ( ('&&' | '||' | '^') unary )*`
    ///
    /// The chain is collected flat; [`Expr::Chain`] groups it to the right.
    fn parse_expr(&mut self) -> Result<Expr, ExprError> {
        let mut links = Vec::new();
        let mut operand = self.parse_unary()?;
        while let Some(op) = self.binary_op() {
            self.advance();
            links.push((operand, op));
            operand = self.parse_unary()?;
        }
        if links.is_empty() {
            return Ok(operand);
        }
        Ok(Expr::Chain {
            links,
            last: Box::new(operand),
        })
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        match self.current().kind {
            TokenKind::And => Some(BinaryOp::And),
            TokenKind::Or => Some(BinaryOp::Or),
            TokenKind::Xor => Some(BinaryOp::Xor),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if !matches!(self.current().kind, TokenKind::Not) {
            return self.parse_primary();
        }
        self.descend()?;
        self.advance();
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::Not(Box::new(operand)))
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let token = self.current();
        match &token.kind {
            TokenKind::Tag(tag) => {
                self.advance();
                Ok(Expr::Tag(tag.clone()))
            }
            TokenKind::ParenOpen => {
                self.descend()?;
                self.advance();
                let expr = self.parse_expr()?;
                self.depth -= 1;
                let close = self.current();
                match close.kind {
                    TokenKind::ParenClose => {
                        self.advance();
                        Ok(expr)
                    }
                    TokenKind::EndOfLine => Err(ExprError::UnclosedParen {
                        offset: token.start,
                    }),
                    ref other => Err(ExprError::Unexpected {
                        expected: "')'",
                        found: other.to_string(),
                        offset: close.start,
                    }),
                }
            }
            other => Err(ExprError::Unexpected {
                expected: "tag or '('",
                found: other.to_string(),
                offset: token.start,
            }),
        }
    }
}
