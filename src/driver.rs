use std::io::Write;

use crate::frontend::{
    ast::{Function, Prototype},
    lexer::{Scanner, Token},
    parser::{Parser, ParserError},
};

/// One successfully parsed top-level unit, ready for a later stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Definition(Box<Function>),
    Extern(Box<Prototype>),
    TopLevelExpr(Box<Function>),
}

/// Where diagnostics and status lines end up, one line per call.
pub trait DiagnosticSink {
    fn report(&mut self, line: &str);

    /// Shown before reading the next top-level unit, without a newline.
    fn prompt(&mut self, prompt: &str) {
        eprint!("{prompt}");
        let _ = std::io::stderr().flush();
    }
}

#[derive(Debug, Default)]
pub struct Stderr;

impl DiagnosticSink for Stderr {
    fn report(&mut self, line: &str) {
        eprintln!("{line}");
    }
}

impl DiagnosticSink for Vec<String> {
    fn report(&mut self, line: &str) {
        self.push(line.to_string());
    }

    fn prompt(&mut self, prompt: &str) {
        self.push(prompt.to_string());
    }
}

pub fn log_error(sink: &mut impl DiagnosticSink, err: &ParserError) {
    sink.report(&format!("LogError: {err}"));
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Parsed(Item),
    Skipped,
    Failed,
    Finished,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub items: usize,
    pub errors: usize,
}

// Decides which production handles the next top-level unit, reports
// failures and resynchronizes by dropping the offending token.
pub struct Driver<I, S> {
    parser: Parser<I>,
    sink: S,
    prompt: Option<String>,
}

impl<I, S> Driver<I, S>
where
    I: Iterator<Item = char>,
    S: DiagnosticSink,
{
    /// Reading the first token happens here, so in interactive mode the
    /// first prompt has to be shown before calling this.
    pub fn new(scanner: Scanner<I>, sink: S) -> Self {
        Self {
            parser: Parser::new(scanner),
            sink,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn show_prompt(&mut self) {
        if let Some(prompt) = &self.prompt {
            self.sink.prompt(prompt);
        }
    }

    fn finish<T>(
        &mut self,
        parsed: Result<T, ParserError>,
        status: &str,
        wrap: impl FnOnce(T) -> Item,
    ) -> Step {
        match parsed {
            Ok(ast) => {
                self.sink.report(status);
                Step::Parsed(wrap(ast))
            }
            Err(err) => {
                log_error(&mut self.sink, &err);
                log::debug!("skipping {} to resynchronize", self.parser.current());
                // Skip token for error recovery.
                self.parser.advance();
                Step::Failed
            }
        }
    }

    /// Handle exactly one top-level unit.
    pub fn handle_next(&mut self) -> Step {
        match *self.parser.current() {
            Token::EndOfInput => Step::Finished,

            // Ignore top-level semicolons.
            Token::Char(';') => {
                self.parser.advance();
                Step::Skipped
            }

            Token::FuncDef => {
                let parsed = self.parser.parse_definition();
                self.finish(parsed, "Parsed a function definition.", Item::Definition)
            }

            Token::Extern => {
                let parsed = self.parser.parse_extern();
                self.finish(parsed, "Parsed an extern.", Item::Extern)
            }

            _ => {
                let parsed = self.parser.parse_top_level_expr();
                self.finish(parsed, "Parsed a top-level expression.", Item::TopLevelExpr)
            }
        }
    }

    /// Parse top-level units until end of input, handing each parsed one to `on_item`.
    pub fn run(&mut self, mut on_item: impl FnMut(&Item)) -> Summary {
        let mut summary = Summary::default();

        loop {
            match self.handle_next() {
                Step::Finished => break,
                Step::Skipped => self.show_prompt(),
                Step::Parsed(item) => {
                    summary.items += 1;
                    on_item(&item);
                    self.show_prompt();
                }
                Step::Failed => {
                    summary.errors += 1;
                    self.show_prompt();
                }
            }
        }

        log::debug!(
            "reached end of input, {} items parsed, {} errors",
            summary.items,
            summary.errors
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lex;
    use pretty_assertions::assert_eq;

    fn run(src: &str) -> (Vec<Item>, Summary, Vec<String>) {
        let mut items = vec![];
        let mut driver = Driver::new(src.lex(), Vec::new());
        let summary = driver.run(|item| items.push(item.clone()));
        (items, summary, driver.into_sink())
    }

    #[test]
    fn dispatches_each_kind_of_unit() {
        let (items, summary, lines) = run("def f(x) x * 2; extern sin(a); f(3) + 1;");

        assert_eq!(summary, Summary { items: 3, errors: 0 });
        assert_eq!(
            lines,
            vec![
                "Parsed a function definition.",
                "Parsed an extern.",
                "Parsed a top-level expression.",
            ]
        );

        match &items[..] {
            [Item::Definition(def), Item::Extern(proto), Item::TopLevelExpr(anon)] => {
                assert_eq!(def.to_string(), "def f(x) (x * 2)");
                assert_eq!(proto.to_string(), "sin(a)");
                assert!(anon.is_anonymous());
                assert_eq!(anon.body.to_string(), "(f(3) + 1)");
            }
            other => panic!("unexpected items: {other:?}"),
        }
    }

    #[test]
    fn reports_once_and_resumes() {
        let (items, summary, lines) = run("(1 + 2; def g() 4");

        assert_eq!(summary, Summary { items: 1, errors: 1 });
        assert_eq!(
            lines,
            vec![
                "LogError: expected ')', found ';'",
                "Parsed a function definition.",
            ]
        );
        assert!(matches!(&items[..], [Item::Definition(_)]));
    }

    #[test]
    fn bad_token_is_skipped() {
        let (items, summary, lines) = run(") 5");

        assert_eq!(summary, Summary { items: 1, errors: 1 });
        assert_eq!(lines[0], "LogError: expected expression, found ')'");
        assert!(matches!(&items[..], [Item::TopLevelExpr(_)]));
    }

    #[test]
    fn bad_function_name_reports_once() {
        let (items, summary, lines) = run("def 1(x) x");

        assert_eq!(summary, Summary { items: 2, errors: 1 });
        assert_eq!(
            lines,
            vec![
                "LogError: expected function name in prototype, found number 1",
                "Parsed a top-level expression.",
                "Parsed a top-level expression.",
            ]
        );

        match &items[..] {
            [Item::TopLevelExpr(paren), Item::TopLevelExpr(var)] => {
                assert_eq!(paren.body.to_string(), "x");
                assert_eq!(var.body.to_string(), "x");
            }
            other => panic!("unexpected items: {other:?}"),
        }
    }

    #[test]
    fn prompts_after_every_unit() {
        let mut driver = Driver::new("1; ; ) def f() 2".lex(), Vec::new()).with_prompt("ready> ");
        let summary = driver.run(|_| {});

        assert_eq!(summary, Summary { items: 2, errors: 1 });
        assert_eq!(
            driver.into_sink(),
            vec![
                "Parsed a top-level expression.",
                "ready> ",
                "ready> ",
                "ready> ",
                "LogError: expected expression, found ')'",
                "ready> ",
                "Parsed a function definition.",
                "ready> ",
            ]
        );
    }

    #[test]
    fn empty_input_finishes_immediately() {
        let mut driver = Driver::new("  # nothing here\n ;;".lex(), Vec::new());

        assert_eq!(driver.handle_next(), Step::Skipped);
        assert_eq!(driver.handle_next(), Step::Skipped);
        assert_eq!(driver.handle_next(), Step::Finished);
        assert_eq!(driver.handle_next(), Step::Finished);
        assert!(driver.sink().is_empty());
    }
}
