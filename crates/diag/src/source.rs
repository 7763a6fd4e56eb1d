use std::borrow::Cow;

use span::Location;

/// Source text a report points into: the raw bytes of a parsed
/// configuration plus the name its errors should cite.
#[derive(Clone, Debug)]
pub struct Source<'a> {
  name: Option<Cow<'a, str>>,
  str: Cow<'a, str>,
}

impl<'a> Source<'a> {
  /// Anonymous input, cited as `<string>` in report headers.
  pub fn string(str: impl Into<Cow<'a, str>>) -> Self {
    Source {
      name: None,
      str: str.into(),
    }
  }

  pub fn file(name: impl Into<Cow<'a, str>>, str: impl Into<Cow<'a, str>>) -> Self {
    Source {
      name: Some(name.into()),
      str: str.into(),
    }
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// The name a `file:line:column` header cites.
  pub fn display_name(&self) -> &str {
    self.name.as_deref().unwrap_or("<string>")
  }

  pub fn str(&self) -> &str {
    self.str.as_ref()
  }

  /// Resolve a byte offset to its 1-based line and column, for
  /// reports whose error did not carry a location of its own.
  /// Counted bytewise, so it tolerates non-UTF-8 input read lossily.
  pub fn locate(&self, offset: usize) -> Location {
    let bytes = &self.str.as_bytes()[..offset.min(self.str.len())];
    let start = bytes
      .iter()
      .rposition(|&b| b == b'\n')
      .map(|i| i + 1)
      .unwrap_or(0);
    Location {
      line: bytes.iter().filter(|&&b| b == b'\n').count() + 1,
      column: bytes.len() - start + 1,
    }
  }
}

impl<'a> From<&'a str> for Source<'a> {
  fn from(value: &'a str) -> Self {
    Source::string(value)
  }
}
