use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::{
    cli::TreeFormat,
    driver::{Driver, Item, Stderr, Summary},
    frontend::lexer::{Lex, Scanner},
};

// Two ways in: an interactive Read-Parse-Print-Loop over stdin, and a
// whole file at once. Both go through the same top-level driver, only
// the character source differs.

/// Character source that pulls one more line from the reader only when
/// the current one is used up, so the scanner blocks exactly when it
/// needs another character.
pub struct LineChars<R> {
    reader: R,
    line: Vec<char>,
    pos: usize,
}

impl<R: BufRead> LineChars<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pos: 0,
        }
    }
}

impl<R: BufRead> Iterator for LineChars<R> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.pos == self.line.len() {
            let mut buf = String::new();
            match self.reader.read_line(&mut buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    log::error!("failed to read input: {err}");
                    return None;
                }
            }
            self.line = buf.chars().collect();
            self.pos = 0;
        }

        let c = self.line[self.pos];
        self.pos += 1;
        Some(c)
    }
}

fn inspect(item: &Item, format: Option<TreeFormat>) {
    let Some(format) = format else {
        return;
    };

    match (format, item) {
        (TreeFormat::Debug, item) => println!("{item:#?}"),
        (TreeFormat::Compact, Item::Definition(func)) => println!("{func}"),
        (TreeFormat::Compact, Item::Extern(proto)) => println!("extern {proto}"),
        (TreeFormat::Compact, Item::TopLevelExpr(func)) => println!("{}", func.body),
    }
}

pub fn ast_parser_driver(prompt: &str, format: Option<TreeFormat>) -> Summary {
    eprint!("{prompt}");
    let _ = io::stderr().flush();

    let stdin = io::stdin().lock();
    let mut driver = Driver::new(Scanner::new(LineChars::new(stdin)), Stderr).with_prompt(prompt);

    driver.run(|item| inspect(item, format))
}

pub fn parse_file(path: &Path, format: Option<TreeFormat>) -> Result<Summary, Box<dyn Error>> {
    let src_code = fs::read_to_string(path)?;
    log::info!("parsing {}", path.display());

    let mut driver = Driver::new(src_code.lex(), Stderr);

    Ok(driver.run(|item| inspect(item, format)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Token;
    use std::io::Cursor;

    #[test]
    fn line_chars_reads_across_lines() {
        let chars = LineChars::new(Cursor::new("ab\nc\n\nd"));

        assert_eq!(chars.collect::<String>(), "ab\nc\n\nd");
    }

    #[test]
    fn scanning_from_a_reader() {
        let reader = Cursor::new("def f(x)\n  x # twice\n");
        let tokens = Scanner::new(LineChars::new(reader)).collect::<Vec<Token>>();

        assert_eq!(
            tokens,
            vec![
                Token::FuncDef,
                Token::Identifier("f".into()),
                Token::Char('('),
                Token::Identifier("x".into()),
                Token::Char(')'),
                Token::Identifier("x".into()),
            ]
        );
    }

    #[test]
    fn parsing_a_file() {
        let path = std::env::temp_dir().join(format!("kaleidoscope-front-{}.k", std::process::id()));
        fs::write(&path, "extern sin(x);\ndef f(a) sin(a) * 2;\nf(1) +;\n").unwrap();

        let summary = parse_file(&path, None).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(summary, Summary { items: 2, errors: 1 });
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_file(Path::new("/definitely/not/here.k"), None).is_err());
    }
}
