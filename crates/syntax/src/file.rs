use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use span::{Location, Span};

use crate::schema::Opt;
use crate::token::{Token, TokenKind};
use crate::{Error, ErrorKind, Result};

pub(crate) const STRING_INPUT: &str = "<string>";

const REFILL_CHUNK: usize = 8 * 1024;

/// One input being parsed: the outermost string or file, or an
/// included file. Files form a stack in the parser; the stack order
/// is the includer chain.
pub(crate) struct File<'s, T> {
  /// Display name: the name in the `include:` directive, the path
  /// given to the driver, or `<string>`.
  pub name: String,
  /// Canonical path, for include cycle checks. `None` for string
  /// input.
  pub path: Option<PathBuf>,
  handle: Option<fs::File>,
  eof: bool,
  pub location: Location,
  /// Raw input bytes. Borrowed for string input, owned and grown by
  /// [`File::refill`] for file input. Tokens hold offsets into it,
  /// never pointers, so growth cannot invalidate them.
  pub data: Cow<'s, [u8]>,
  /// Consumed offset: where the next token starts.
  pub first: usize,
  pub tokens: Vec<Token<'s, T>>,
  /// Cursor: index of the next token to shift.
  pub last: usize,
  /// Index of the most recent `Space` token directly following a
  /// `LineFeed`, 0 if none.
  pub indent: usize,
}

impl<'s, T> File<'s, T> {
  fn new(
    name: String,
    path: Option<PathBuf>,
    handle: Option<fs::File>,
    data: Cow<'s, [u8]>,
  ) -> File<'s, T> {
    let location = Location::start();
    let mut tokens = Vec::with_capacity(64);
    // index 0 is the zero-length indent sentinel for the file scope
    tokens.push(Token {
      kind: TokenKind::Space,
      location,
      first: 0,
      size: 0,
      node: None,
    });

    File {
      name,
      path,
      handle,
      eof: false,
      location,
      data,
      first: 0,
      tokens,
      last: 1,
      indent: 0,
    }
  }

  pub fn from_bytes(source: &'s [u8]) -> File<'s, T> {
    File::new(STRING_INPUT.to_owned(), None, None, Cow::Borrowed(source))
  }

  pub fn open(path: &Path) -> Result<File<'s, T>> {
    let name = path.display().to_string();
    let handle = fs::File::open(path).map_err(|e| open_error(e, &name))?;
    let resolved = fs::canonicalize(path).map_err(|e| open_error(e, &name))?;
    Ok(File::new(
      name,
      Some(resolved),
      Some(handle),
      Cow::Owned(Vec::new()),
    ))
  }

  /// True when no further input can be read.
  pub fn empty(&self) -> bool {
    self.handle.is_none() || self.eof
  }

  /// Extend the buffer by one chunk from the handle; a no-op for
  /// string input. Already-read bytes never move relative to the
  /// offsets live tokens hold.
  pub fn refill(&mut self) -> Result<()> {
    let Some(handle) = self.handle.as_mut() else {
      return Ok(());
    };
    if self.eof {
      return Ok(());
    }

    let data = self.data.to_mut();
    let len = data.len();
    data.resize(len + REFILL_CHUNK, 0);
    let read = handle.read(&mut data[len..]);
    match read {
      Ok(n) => {
        data.truncate(len + n);
        if n == 0 {
          self.eof = true;
        }
        Ok(())
      }
      Err(e) => {
        data.truncate(len);
        Err(Error::new(
          ErrorKind::NoAccess,
          format!("cannot read `{}`: {e}", self.name),
          self.name.clone(),
          self.location,
          Span::default(),
        ))
      }
    }
  }

  /// Append one token, advancing the consumed offset and the
  /// line/column bookkeeping.
  pub fn push_token(
    &mut self,
    kind: TokenKind,
    first: usize,
    last: usize,
    node: Option<&'s Opt<T>>,
  ) -> TokenKind {
    debug_assert!(last >= first);
    debug_assert_eq!(kind == TokenKind::Eof, last == first);

    let size = last - first;
    self.tokens.push(Token {
      kind,
      location: self.location,
      first,
      size,
      node,
    });
    self.first += size;

    if kind == TokenKind::LineFeed {
      debug_assert_eq!(size, 1);
      self.location.line += 1;
      self.location.column = 1;
    } else {
      self.location.column += size;
    }

    kind
  }
}

fn open_error(e: std::io::Error, name: &str) -> Error {
  let kind = match e.kind() {
    std::io::ErrorKind::PermissionDenied => ErrorKind::NoAccess,
    _ => ErrorKind::NoSuchFile,
  };
  Error::new(
    kind,
    format!("cannot open `{name}`: {e}"),
    name,
    Location::start(),
    Span::default(),
  )
}
