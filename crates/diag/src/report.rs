//! Error reporting
//!
//! A [`Report`] renders a parse error the way the rest of the
//! toolchain prints it: a severity line, a `file:line:column` header,
//! and the offending line with the spanned region underlined.

use std::fmt;
use std::fmt::{Display, Write};
use std::ops::Range;

use beef::lean::Cow;
use owo_colors::{OwoColorize, Style};
use span::{Location, Span};
use thiserror::Error;

use crate::snippet::Snippet;
use crate::source::Source;

#[derive(Clone, Copy, Debug)]
pub enum Level {
  Info,
  Warning,
  Error,
}

impl Level {
  fn color(self) -> Style {
    match self {
      Level::Info => Style::new().blue(),
      Level::Warning => Style::new().yellow(),
      Level::Error => Style::new().red(),
    }
  }
}

/// A single diagnostic that may be emitted to anything which
/// implements [`fmt::Write`].
pub struct Report<'a> {
  pub level: Level,
  pub source: Source<'a>,
  pub message: Cow<'a, str>,
  pub span: Span,
  pub location: Option<Location>,
  pub color: bool,
}

impl<'a> Report<'a> {
  pub fn new(
    level: Level,
    source: impl Into<Source<'a>>,
    message: impl Into<Cow<'a, str>>,
    span: impl Into<Span>,
  ) -> Self {
    Report {
      level,
      source: source.into(),
      message: message.into(),
      span: span.into(),
      location: None,
      color: true,
    }
  }

  /// An `Info`-level report.
  pub fn info(
    source: impl Into<Source<'a>>,
    message: impl Into<Cow<'a, str>>,
    span: impl Into<Span>,
  ) -> Self {
    Report::new(Level::Info, source, message, span)
  }

  /// A `Warning`-level report.
  pub fn warn(
    source: impl Into<Source<'a>>,
    message: impl Into<Cow<'a, str>>,
    span: impl Into<Span>,
  ) -> Self {
    Report::new(Level::Warning, source, message, span)
  }

  /// An `Error`-level report.
  pub fn error(
    source: impl Into<Source<'a>>,
    message: impl Into<Cow<'a, str>>,
    span: impl Into<Span>,
  ) -> Self {
    Report::new(Level::Error, source, message, span)
  }

  /// Use `location` in the header instead of resolving the span's
  /// start offset against the source.
  pub fn location(mut self, location: Location) -> Self {
    self.location = Some(location);
    self
  }

  pub fn color(mut self, enabled: bool) -> Self {
    self.color = enabled;
    self
  }

  /// Emit the report to `w`.
  pub fn emit<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
    // error: line feed in quoted value
    // > zones.conf:1:6
    // |
    // | name: "example
    // |

    if self.source.str().get(Range::from(self.span)).is_none() {
      return Err(EmitError::OutOfBounds);
    }

    // a disabled color flag leaves every style empty, which emits no
    // escape codes at all
    let (level, spanned, symbol) = if self.color {
      (
        self.level.color(),
        self.level.color().underline(),
        Style::new().blue(),
      )
    } else {
      (Style::new(), Style::new(), Style::new())
    };

    let snippet = Snippet::new(self.source.str(), self.span);
    let location = self
      .location
      .unwrap_or_else(|| self.source.locate(self.span.start));

    // {level}: {message}
    writeln!(w, "{}: {}", self.level.style(level), self.message)?;
    // > {name}:{line}:{column}
    writeln!(
      w,
      "{} {}:{}",
      ">".style(symbol),
      self.source.display_name(),
      location
    )?;

    // empty line to give the snippet some room
    writeln!(w, "{} ", "|".style(symbol))?;
    let highlight = &snippet.text[snippet.span.range()];
    if highlight.trim().is_empty() {
      // nothing visible to underline, which happens when the span
      // lands on a line feed or at end of input
      let width = highlight.len().max(1);
      writeln!(
        w,
        "{} {}{}",
        "|".style(symbol),
        &snippet.text[..snippet.span.start],
        format!("{:_<width$}", "").style(spanned),
      )?;
    } else {
      // | {text}{spanned_text}{text}
      writeln!(
        w,
        "{} {}{}{}",
        "|".style(symbol),
        &snippet.text[..snippet.span.start],
        highlight.style(spanned),
        &snippet.text[snippet.span.end..]
      )?;
    }
    // empty line at the end for symmetry
    writeln!(w, "{} ", "|".style(symbol))?;

    Ok(())
  }

  /// Emit the report to a string.
  pub fn emit_to_string(&self) -> Result<String, EmitError> {
    let mut buf = String::new();
    self.emit(&mut buf)?;
    Ok(buf)
  }
}

#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to format")]
  Fmt(#[from] fmt::Error),
  #[error("span does not fit within source string")]
  OutOfBounds,
}

impl Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let level = match self {
      Level::Info => "info",
      Level::Warning => "warning",
      Level::Error => "error",
    };
    write!(f, "{level}")
  }
}
