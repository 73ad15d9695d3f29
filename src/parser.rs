pub mod lexer;

use crate::ast::{CompareOp, Literal, Operation, ParsedQuery, Predicate, Projection};
use crate::parser::lexer::{Keyword, Lexer, Token};

/// Statements recognised by the parser but not executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text does not start with a supported verb
    UnsupportedStatement(Statement),
    /// A token was found where the grammar expects something else
    UnexpectedToken { expected: String, found: String },
    /// The statement ended early
    UnexpectedEnd { expected: String },
    /// A quoted literal starting at the given byte offset was never closed
    UnterminatedString(usize),
}

impl ParseError {
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedStatement(_))
    }

    fn unexpected(expected: impl Into<String>, found: Option<&Token>) -> Self {
        match found {
            Some(token) => Self::UnexpectedToken {
                expected: expected.into(),
                found: token.to_string(),
            },
            None => Self::UnexpectedEnd {
                expected: expected.into(),
            },
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedStatement(Statement::Insert) => {
                write!(f, "INSERT not implemented in this read-only demo.")
            }
            Self::UnsupportedStatement(Statement::Unknown) => {
                write!(f, "Unsupported query type. Try SELECT.")
            }
            Self::UnexpectedToken { expected, found } => {
                write!(f, "Invalid SELECT syntax: expected {expected}, found {found}")
            }
            Self::UnexpectedEnd { expected } => {
                write!(f, "Invalid SELECT syntax: expected {expected}, found end of input")
            }
            Self::UnterminatedString(pos) => {
                write!(f, "Invalid SELECT syntax: unterminated string at position {pos}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse query text into a [`ParsedQuery`].
pub fn parse_query(text: &str) -> Result<ParsedQuery, ParseError> {
    Parser::new(text.trim()).parse()
}

/// Recursive-descent parser over the token stream of a single statement.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            current: None,
        }
    }

    pub fn parse(mut self) -> Result<ParsedQuery, ParseError> {
        // The verb is recognised by prefix, so `selectx` is a malformed SELECT
        // and `inserts` is still an INSERT. Anything that fails to lex before
        // the verb is just not a query.
        match self.lexer.next() {
            Some(Ok(token)) if token.is_keyword(Keyword::Select) => {}
            Some(Ok(token)) if has_verb_prefix(&token, Keyword::Select) => {
                return Err(ParseError::unexpected(Keyword::Select.as_str(), Some(&token)));
            }
            Some(Ok(token)) if has_verb_prefix(&token, Keyword::Insert) => {
                return Err(ParseError::UnsupportedStatement(Statement::Insert));
            }
            _ => return Err(ParseError::UnsupportedStatement(Statement::Unknown)),
        }

        self.advance()?;
        self.parse_select()
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next().transpose()?;
        Ok(())
    }

    fn parse_select(&mut self) -> Result<ParsedQuery, ParseError> {
        let projection = self.parse_projection()?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_identifier("table name")?;

        let predicate = if self.at_keyword(Keyword::Where) {
            self.advance()?;
            Some(self.parse_predicate()?)
        } else {
            None
        };

        if self.current == Some(Token::Semicolon) {
            self.advance()?;
        }
        if self.current.is_some() {
            return Err(ParseError::unexpected("end of query", self.current.as_ref()));
        }

        Ok(ParsedQuery {
            operation: Operation::Select,
            table,
            projection,
            predicate,
        })
    }

    fn parse_projection(&mut self) -> Result<Projection, ParseError> {
        if self.current == Some(Token::Star) {
            self.advance()?;
            return Ok(Projection::All);
        }

        let mut columns = vec![self.parse_identifier("column list or '*'")?];
        while self.current == Some(Token::Comma) {
            self.advance()?;
            columns.push(self.parse_identifier("column name")?);
        }
        Ok(Projection::Columns(columns))
    }

    fn parse_predicate(&mut self) -> Result<Predicate, ParseError> {
        let column = self.parse_identifier("column name")?;

        let op = match &self.current {
            Some(Token::Equals) => CompareOp::Equals,
            Some(token) if token.is_keyword(Keyword::Like) => CompareOp::Like,
            other => return Err(ParseError::unexpected("'=' or LIKE", other.as_ref())),
        };
        self.advance()?;

        let literal = self.parse_literal()?;
        let literal = match op {
            CompareOp::Equals => literal,
            CompareOp::Like => Literal {
                text: literal.text.replace('%', ""),
                quoted: literal.quoted,
            },
        };

        Ok(Predicate {
            column,
            op,
            literal,
        })
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let literal = match &self.current {
            Some(Token::Quoted(text)) => Literal::quoted(text.clone()),
            Some(Token::Word(text)) => Literal::bare(text.clone()),
            other => return Err(ParseError::unexpected("literal value", other.as_ref())),
        };
        self.advance()?;
        Ok(literal)
    }

    fn parse_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        match &self.current {
            Some(Token::Word(w)) if is_identifier(w) && Keyword::lookup(w).is_none() => {
                let ident = w.clone();
                self.advance()?;
                Ok(ident)
            }
            other => Err(ParseError::unexpected(expected, other.as_ref())),
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.at_keyword(keyword) {
            self.advance()
        } else {
            Err(ParseError::unexpected(keyword.as_str(), self.current.as_ref()))
        }
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current
            .as_ref()
            .is_some_and(|token| token.is_keyword(keyword))
    }
}

fn has_verb_prefix(token: &Token, verb: Keyword) -> bool {
    let verb = verb.as_str();
    matches!(token, Token::Word(w) if w
        .get(..verb.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(verb)))
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
