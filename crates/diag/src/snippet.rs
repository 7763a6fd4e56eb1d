use span::Span;

/// The single line a span points into, extracted from the full
/// source. Config errors never span lines, so a snippet is the line
/// containing the span's start; a span reaching past the line end is
/// clamped to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Snippet<'a> {
  /// The line, without its terminating line feed.
  pub text: &'a str,
  /// The highlighted region, relative to `text`.
  pub span: Span,
}

impl<'a> Snippet<'a> {
  pub fn new(src: &'a str, span: impl Into<Span>) -> Self {
    let span: Span = span.into();

    let start = src[..span.start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = src[span.start..]
      .find('\n')
      .map(|i| i + span.start)
      .unwrap_or(src.len());

    Snippet {
      text: &src[start..end],
      span: Span {
        start: span.start - start,
        end: span.end.min(end).max(span.start) - start,
      },
    }
  }

  #[cfg(test)]
  pub fn highlight(&self) -> &str {
    &self.text[self.span.range()]
  }
}
