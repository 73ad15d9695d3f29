use crate::parser::ParseError;
use std::iter::Peekable;
use std::str::CharIndices;

/// Keywords recognised by the query surface. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Where,
    Like,
    Insert,
}

impl Keyword {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Like => "LIKE",
            Self::Insert => "INSERT",
        }
    }

    pub fn lookup(word: &str) -> Option<Self> {
        [
            Self::Select,
            Self::From,
            Self::Where,
            Self::Like,
            Self::Insert,
        ]
        .into_iter()
        .find(|kw| kw.as_str().eq_ignore_ascii_case(word))
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unquoted run of characters: keywords, identifiers and bare literals.
    Word(String),
    /// Single- or double-quoted text with the quotes stripped.
    Quoted(String),
    Comma,
    Equals,
    Star,
    Semicolon,
}

impl Token {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Word(w) if keyword.as_str().eq_ignore_ascii_case(w))
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self {
            Self::Word(w) => Keyword::lookup(w),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Word(w) => write!(f, "'{w}'"),
            Self::Quoted(s) => write!(f, "string '{s}'"),
            Self::Comma => write!(f, "','"),
            Self::Equals => write!(f, "'='"),
            Self::Star => write!(f, "'*'"),
            Self::Semicolon => write!(f, "';'"),
        }
    }
}

/// Splits query text into tokens on demand.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn scan_quoted(&mut self, start: usize, quote: char) -> Result<Token, ParseError> {
        let mut text = String::new();
        while let Some((_, c)) = self.chars.next() {
            if c == quote {
                // A doubled quote inside a literal stands for the quote itself.
                if self.chars.next_if(|(_, n)| *n == quote).is_some() {
                    text.push(quote);
                    continue;
                }
                return Ok(Token::Quoted(text));
            }
            text.push(c);
        }
        Err(ParseError::UnterminatedString(start))
    }

    fn scan_word(&mut self, start: usize) -> Token {
        let mut end = self.input.len();
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_whitespace() || is_delimiter(c) {
                end = i;
                break;
            }
            self.chars.next();
        }
        Token::Word(self.input[start..end].to_string())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let &(start, c) = self.chars.peek()?;

        let token = match c {
            ',' => Ok(Token::Comma),
            '=' => Ok(Token::Equals),
            '*' => Ok(Token::Star),
            ';' => Ok(Token::Semicolon),
            '\'' | '"' => {
                self.chars.next();
                return Some(self.scan_quoted(start, c));
            }
            _ => return Some(Ok(self.scan_word(start))),
        };
        self.chars.next();
        Some(token)
    }
}

const fn is_delimiter(c: char) -> bool {
    matches!(c, ',' | '=' | '*' | ';' | '\'' | '"')
}
