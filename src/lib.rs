//! A schema-directed parser for indented configuration files.
//!
//! The language is a constrained YAML/ini hybrid: nested *sections*,
//! *options* with values, inline `name=value` *suboptions*, and
//! `include:` directives whose file names may use `*`/`?` wildcards:
//!
//! ```text
//! section:
//!   option: value  suboption=value other=value
//!
//! section:
//!   option: "quoted value"
//!
//! include: conf.d/*.conf
//! ```
//!
//! Callers declare a static schema of recognized identifiers
//! ([`Opt`]) and receive `enter`/`exit`/`accept` callbacks (a
//! [`Hook`] per event) as the parser walks scopes and accepts
//! values. Indentation is significant and compared as a literal byte
//! prefix, so tabs and spaces may mix as long as each level extends
//! its parent's exact bytes.
//!
//! ```
//! use opal::{Lexeme, Opt};
//!
//! fn collect(node: &Opt<Vec<String>>, lexeme: &Lexeme<'_>, values: &mut Vec<String>) -> i32 {
//!   values.push(format!("{}={}", node.pattern(), lexeme.text()));
//!   0
//! }
//!
//! let schema = vec![Opt::section(
//!   "zone",
//!   vec![Opt::option("file").on_accept(collect)],
//! )];
//!
//! let mut values = Vec::new();
//! opal::parse_options(&schema, "zone:\n  file: db.example\n", &mut values).unwrap();
//! assert_eq!(values, ["file=db.example"]);
//! ```

use std::path::Path;

pub use diag::{Report, Source};
pub use span::{Location, Span};
pub use syntax::{Error, ErrorKind, Hook, Lexeme, Opt, OptKind, Result};

/// Parse a configuration string against `options`, delivering events
/// to `context`.
///
/// The source does not have to be UTF-8; value bytes reach accept
/// hooks untouched.
pub fn parse_options<T>(
  options: &[Opt<T>],
  source: impl AsRef<[u8]>,
  context: &mut T,
) -> Result<()> {
  syntax::parse(options, source.as_ref(), context)
}

/// Parse the configuration file at `path` against `options`,
/// delivering events to `context`.
///
/// `include:` directives open further files relative to the process
/// working directory and may use wildcards in the final path
/// component.
pub fn parse_options_file<T>(
  options: &[Opt<T>],
  path: impl AsRef<Path>,
  context: &mut T,
) -> Result<()> {
  syntax::parse_file(options, path.as_ref(), context)
}
