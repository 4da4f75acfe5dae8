use std::collections::HashMap;

use lazy_static::lazy_static;
use thiserror::Error;

use crate::frontend::{
    ast::*,
    lexer::{Scanner, Token},
};

// Binary operators and how tightly they bind, higher binds tighter.
// In the C++ tutorial, this variable is called "BinopPrecedence"
lazy_static! {
    static ref OP_PRECEDENCE: HashMap<char, i32> = {
        let mut map = HashMap::new();
        map.insert('<', 10);
        map.insert('+', 20);
        map.insert('-', 20);
        map.insert('*', 40);
        map
    };
}

// What went wrong during parsing, along with the token
// that was sitting in the lookahead when it did.
#[derive(Error, PartialEq, Debug)]
pub enum ParserError {
    #[error("expected expression, found {0}")]
    ExpectedExpression(Token),

    #[error("expected ')', found {0}")]
    ExpectedClosedParen(Token),

    #[error("expected ')' or ',' in argument list, found {0}")]
    ExpectedArgDelimiter(Token),

    #[error("expected function name in prototype, found {0}")]
    ExpectedFunctionName(Token),

    #[error("expected '(' in prototype, found {0}")]
    ExpectedProtoOpenParen(Token),

    #[error("expected ')' in prototype, found {0}")]
    ExpectedProtoClosedParen(Token),
}

impl ParserError {
    pub fn token(&self) -> &Token {
        match self {
            ParserError::ExpectedExpression(tok)
            | ParserError::ExpectedClosedParen(tok)
            | ParserError::ExpectedArgDelimiter(tok)
            | ParserError::ExpectedFunctionName(tok)
            | ParserError::ExpectedProtoOpenParen(tok)
            | ParserError::ExpectedProtoClosedParen(tok) => tok,
        }
    }
}

// Small alias for fallible returns of parsing expressions
type ExprParseResult = Result<Box<ASTExpr>, ParserError>;

/// Fetch the precedence of a binary operator token, -1 for anything
/// that isn't one. Tutorial names this GetTokPrecedence
pub fn get_token_precedence(token: &Token) -> i32 {
    match token {
        Token::Char(c) => OP_PRECEDENCE.get(c).copied().unwrap_or(-1),
        _ => -1,
    }
}

/// Recursive descent parser holding a single token of lookahead.
#[derive(Debug)]
pub struct Parser<I> {
    scanner: Scanner<I>,
    current: Token,
}

impl<I> Parser<I>
where
    I: Iterator<Item = char>,
{
    /// Creates the parser and reads the first token into the lookahead.
    pub fn new(mut scanner: Scanner<I>) -> Self {
        let current = scanner.next_token();
        Self { scanner, current }
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Replace the lookahead with the next token from the scanner.
    pub fn advance(&mut self) -> &Token {
        self.current = self.scanner.next_token();
        &self.current
    }

    // Moves the lookahead out, advancing past it.
    fn take(&mut self) -> Token {
        let next = self.scanner.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn at_char(&self, c: char) -> bool {
        self.current == Token::Char(c)
    }

    /// external ::= 'extern' prototype
    pub fn parse_extern(&mut self) -> Result<Box<Prototype>, ParserError> {
        // Swallow the 'extern' keyword, parse as prototype
        self.advance();
        self.parse_prototype()
    }

    /// prototype
    ///   ::= id '(' id* ')'
    pub fn parse_prototype(&mut self) -> Result<Box<Prototype>, ParserError> {
        // Leave a bad name in the lookahead, it's the caller's to skip.
        let name = match &self.current {
            Token::Identifier(name) => name.clone(),
            unexpected => return Err(ParserError::ExpectedFunctionName(unexpected.clone())),
        };
        self.advance();

        if !self.at_char('(') {
            return Err(ParserError::ExpectedProtoOpenParen(self.current.clone()));
        }
        self.advance();

        let mut args = vec![];

        while let Token::Identifier(arg) = &self.current {
            args.push(arg.clone());
            self.advance();
        }

        if !self.at_char(')') {
            return Err(ParserError::ExpectedProtoClosedParen(self.current.clone()));
        }
        self.advance();

        Ok(Box::new(Prototype { name, args }))
    }

    /// definition ::= 'def' prototype expression
    pub fn parse_definition(&mut self) -> Result<Box<Function>, ParserError> {
        // swallow the def keyword
        self.advance();

        // try to parse prototype and body
        let proto = self.parse_prototype()?;
        let body = self.parse_expression()?;

        log::debug!("parsed definition of {}", proto.name);

        Ok(Box::new(Function { proto, body }))
    }

    /// toplevelexpr ::= expression
    pub fn parse_top_level_expr(&mut self) -> Result<Box<Function>, ParserError> {
        let body = self.parse_expression()?;
        let proto = Box::new(Prototype::anonymous());

        log::debug!("parsed top-level expression {}", body);

        Ok(Box::new(Function { proto, body }))
    }

    /// primary
    ///   ::= identifierexpr
    ///   ::= numberexpr
    ///   ::= parenexpr
    pub fn parse_primary(&mut self) -> ExprParseResult {
        match self.current {
            Token::Identifier(_) => self.parse_identifier_expr(),

            Token::Number(_) => self.parse_number_expr(),

            Token::Char('(') => self.parse_paren_expr(),

            _ => Err(ParserError::ExpectedExpression(self.current.clone())),
        }
    }

    /// numberexpr ::= number
    fn parse_number_expr(&mut self) -> ExprParseResult {
        match self.take() {
            Token::Number(num) => Ok(Box::new(ASTExpr::NumberExpr(num))),
            unexpected => Err(ParserError::ExpectedExpression(unexpected)),
        }
    }

    /// identifierexpr
    ///   ::= identifier
    ///   ::= identifier '(' (expression (',' expression)*)? ')'
    fn parse_identifier_expr(&mut self) -> ExprParseResult {
        let name = match self.take() {
            Token::Identifier(name) => name,
            unexpected => return Err(ParserError::ExpectedExpression(unexpected)),
        };

        // Variable Expression
        if !self.at_char('(') {
            return Ok(Box::new(ASTExpr::VariableExpr(name)));
        }

        // Call Expression
        self.advance();

        let mut args = vec![];

        if !self.at_char(')') {
            loop {
                args.push(*self.parse_expression()?);

                match self.current {
                    Token::Char(')') => break,
                    Token::Char(',') => {
                        self.advance();
                    }
                    _ => return Err(ParserError::ExpectedArgDelimiter(self.current.clone())),
                }
            }
        }

        // Swallow the closed parenthesis
        self.advance();

        Ok(Box::new(ASTExpr::CallExpr { callee: name, args }))
    }

    /// parenexpr ::= '(' expression ')'
    fn parse_paren_expr(&mut self) -> ExprParseResult {
        // Swallow the open parenthesis
        self.advance();

        // Parse the expression inside it
        let expr = self.parse_expression()?;

        // Should be a closed parenthesis following it.
        if !self.at_char(')') {
            return Err(ParserError::ExpectedClosedParen(self.current.clone()));
        }
        self.advance();

        Ok(expr)
    }

    /// expression
    ///   ::= primary binoprhs
    ///
    pub fn parse_expression(&mut self) -> ExprParseResult {
        let lhs = self.parse_primary()?;

        self.parse_binop_rhs(0, lhs)
    }

    /// binoprhs
    ///   ::= (binop primary)*
    pub fn parse_binop_rhs(&mut self, expr_prec: i32, mut lhs: Box<ASTExpr>) -> ExprParseResult {
        loop {
            let tok_prec = get_token_precedence(&self.current);

            // Anything that isn't a binary operator ends the chain, whatever
            // the minimum precedence asked for.
            let op = match self.current {
                Token::Char(op) if tok_prec >= 0 && tok_prec >= expr_prec => op,
                _ => return Ok(lhs),
            };
            self.advance();

            let mut rhs = self.parse_primary()?;

            // If the next operator binds tighter, let it take
            // rhs as its own left hand side first.
            let next_prec = get_token_precedence(&self.current);

            if tok_prec < next_prec {
                rhs = self.parse_binop_rhs(tok_prec + 1, rhs)?;
            }

            lhs = Box::new(ASTExpr::BinaryExpr {
                op,
                left: lhs,
                right: rhs,
            });
        }
    }
}
