use beef::lean::Cow;
use span::{Location, Span};

mod chars;
mod file;
mod parser;
mod scanner;
pub mod schema;
mod scope;
mod token;

pub use parser::{parse, parse_file};
pub use schema::{Hook, Lexeme, Opt, OptKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A failed parse: what went wrong, and where.
#[derive(Clone, Debug)]
pub struct Error {
  pub kind: ErrorKind,
  pub message: Cow<'static, str>,
  /// Display name of the file the error points into (`<string>` for
  /// string input, `<schema>` for schema validation failures).
  pub file: String,
  pub location: Location,
  pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  /// Scanner-level errors: invalid bytes, broken quoting.
  Syntax,
  /// Parser-level errors: indentation and grammar violations,
  /// include cycles, include depth.
  Semantic,
  NoSuchFile,
  NoAccess,
  /// Rejected schema or filespec.
  BadParameter,
  /// A callback returned this negative code.
  Callback(i32),
}

impl Error {
  pub fn new(
    kind: ErrorKind,
    message: impl Into<Cow<'static, str>>,
    file: impl Into<String>,
    location: Location,
    span: impl Into<Span>,
  ) -> Self {
    Error {
      kind,
      message: message.into(),
      file: file.into(),
      location,
      span: span.into(),
    }
  }

  pub(crate) fn schema(message: impl Into<Cow<'static, str>>) -> Self {
    Error::new(
      ErrorKind::BadParameter,
      message,
      "<schema>",
      Location::start(),
      Span::default(),
    )
  }

  /// Render this error against the source text it points into.
  pub fn report<'a>(&'a self, source: &'a str) -> diag::Report<'a> {
    diag::Report::error(
      diag::Source::file(self.file.as_str(), source),
      self.message.as_ref(),
      self.span,
    )
    .location(self.location)
  }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let Error {
      file,
      location,
      message,
      ..
    } = self;
    write!(f, "{file}:{location}: {message}")
  }
}
