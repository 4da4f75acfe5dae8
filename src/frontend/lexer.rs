use std::fmt;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    EndOfInput,
    FuncDef,
    Extern,
    Identifier(String),
    Number(f64),
    // Operators, parenthesis, delimiters and anything else the
    // scanner doesn't know about, tagged by the character itself.
    Char(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::EndOfInput => write!(f, "end of input"),
            Token::FuncDef => write!(f, "'def'"),
            Token::Extern => write!(f, "'extern'"),
            Token::Identifier(name) => write!(f, "identifier '{name}'"),
            Token::Number(num) => write!(f, "number {num}"),
            Token::Char(c) => write!(f, "'{}'", c.escape_default()),
        }
    }
}

#[inline(always)]
fn keyword_or_identifier(word: String) -> Token {
    match word.as_str() {
        "def" => Token::FuncDef,
        "extern" => Token::Extern,
        _ => Token::Identifier(word),
    }
}

// Lenient like strtod: take the longest prefix that reads as a decimal,
// "1.2.3" is 1.2 and a lone "." is 0. The run only holds digits and points,
// so that prefix ends right before the second point.
fn to_number(text: &str) -> f64 {
    let end = text
        .match_indices('.')
        .nth(1)
        .map_or(text.len(), |(pos, _)| pos);
    let prefix = &text[..end];

    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return 0.0;
    }
    prefix.parse::<f64>().unwrap_or(0.0)
}

/// Pulls characters from its source one at a time and turns them into
/// tokens. The only state carried between calls is the character read
/// past the end of the previous token.
#[derive(Debug)]
pub struct Scanner<I> {
    chars: I,
    last_char: Option<char>,
}

impl<I> Scanner<I>
where
    I: Iterator<Item = char>,
{
    pub fn new(chars: I) -> Self {
        Self {
            chars,
            last_char: Some(' '),
        }
    }

    fn bump(&mut self) {
        self.last_char = self.chars.next();
    }

    /// Returns the next token, `EndOfInput` once the source is exhausted
    /// (and on every call after that).
    pub fn next_token(&mut self) -> Token {
        let token = self.scan();
        log::trace!("scanned {:?}", token);
        token
    }

    fn scan(&mut self) -> Token {
        loop {
            while matches!(self.last_char, Some(c) if c.is_whitespace()) {
                self.bump();
            }

            let Some(c) = self.last_char else {
                return Token::EndOfInput;
            };

            if c.is_ascii_alphabetic() {
                let mut word = String::new();
                while let Some(c) = self.last_char.filter(char::is_ascii_alphanumeric) {
                    word.push(c);
                    self.bump();
                }
                return keyword_or_identifier(word);
            }

            if c.is_ascii_digit() || c == '.' {
                let mut text = String::new();
                while let Some(c) = self.last_char.filter(|c| c.is_ascii_digit() || *c == '.') {
                    text.push(c);
                    self.bump();
                }
                return Token::Number(to_number(&text));
            }

            if c == '#' {
                // Comment runs up to the end of the line, then go around
                // again for the next real token.
                while !matches!(self.last_char, None | Some('\n') | Some('\r')) {
                    self.bump();
                }
                continue;
            }

            self.bump();
            return Token::Char(c);
        }
    }
}

/// Yields tokens up to, but not including, `EndOfInput`.
impl<I> Iterator for Scanner<I>
where
    I: Iterator<Item = char>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::EndOfInput => None,
            token => Some(token),
        }
    }
}

pub trait Lex {
    fn lex(&self) -> Scanner<Chars<'_>>;
}

impl Lex for str {
    fn lex(&self) -> Scanner<Chars<'_>> {
        Scanner::new(self.chars())
    }
}
