//! Front end for the Kaleidoscope tutorial language: turns source text into
//! tokens and tokens into an AST, ready for a later compilation stage.
//!
//! ```text
//! chars → frontend::lexer → frontend::parser → frontend::ast → driver::Item
//! ```

pub mod cli;
pub mod driver;
pub mod frontend;
pub mod repl;
