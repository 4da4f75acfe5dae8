use std::path::PathBuf;

use clap::{
    builder::PossibleValue,
    Parser, ValueEnum,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// A positional file containing Kaleidoscope code to parse, if not given, starts interpreter instead
    pub file: Option<PathBuf>,

    /// Prints out the AST to stdout after every top-level item parsed
    #[arg(long, value_enum)]
    pub inspect_tree: Option<TreeFormat>,

    /// Prompt shown by the interpreter before each top-level item
    #[arg(long, default_value = "ready> ")]
    pub prompt: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TreeFormat {
    Debug,
    Compact,
}

impl ValueEnum for TreeFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[TreeFormat::Debug, TreeFormat::Compact]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            TreeFormat::Debug => PossibleValue::new("debug").help("Rust debug representation of the nodes"),
            TreeFormat::Compact => PossibleValue::new("compact").help("One line, fully parenthesised"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interpreter() {
        let cli = Cli::try_parse_from(["kaleidoscope-front"]).unwrap();

        assert!(cli.file.is_none());
        assert_eq!(cli.inspect_tree, None);
        assert_eq!(cli.prompt, "ready> ");
    }

    #[test]
    fn file_and_tree_format() {
        let cli = Cli::try_parse_from(["kaleidoscope-front", "--inspect-tree", "compact", "prog.k"]).unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("prog.k")));
        assert_eq!(cli.inspect_tree, Some(TreeFormat::Compact));
    }

    #[test]
    fn rejects_unknown_tree_format() {
        assert!(Cli::try_parse_from(["kaleidoscope-front", "--inspect-tree", "json"]).is_err());
    }
}
