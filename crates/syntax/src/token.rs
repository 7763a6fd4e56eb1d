use span::{Location, Span};

use crate::schema::Opt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
  Eof,
  Space,
  LineFeed,
  Comment,
  Section,
  Option,
  Suboption,
  Include,
  Value,
  QuotedValue,
}

impl TokenKind {
  /// Sections, options, suboptions and includes: everything scanned
  /// as an identifier with an accepted discriminator.
  pub fn is_identifier(self) -> bool {
    matches!(
      self,
      TokenKind::Section | TokenKind::Option | TokenKind::Suboption | TokenKind::Include
    )
  }

  pub fn is_value(self) -> bool {
    matches!(self, TokenKind::Value | TokenKind::QuotedValue)
  }
}

/// One scanned token. `first` and `size` index the owning file's
/// buffer; `node` points at the schema node an identifier resolved
/// to (`Include` tokens are built-in and carry none).
pub(crate) struct Token<'s, T> {
  pub kind: TokenKind,
  pub location: Location,
  pub first: usize,
  pub size: usize,
  pub node: Option<&'s Opt<T>>,
}

impl<'s, T> Token<'s, T> {
  pub fn span(&self) -> Span {
    Span {
      start: self.first,
      end: self.first + self.size,
    }
  }
}

/// Which identifier reclassifications the parser permits at the
/// current position.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Permit {
  pub option: bool,
  pub suboption: bool,
  pub value: bool,
}

impl Permit {
  pub const NONE: Permit = Permit {
    option: false,
    suboption: false,
    value: false,
  };
}
