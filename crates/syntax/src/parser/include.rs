//! The include manager: wildcard expansion, cycle prevention, and
//! splicing included files into the current grammar.

use std::path::Path;

use glob::EntryKind;

use super::{Parser, MAX_INCLUDE_DEPTH};
use crate::file::File;
use crate::scope::Scope;
use crate::token::{Permit, TokenKind};
use crate::{ErrorKind, Result};

impl<'s, 'c, T> Parser<'s, 'c, T> {
  /// `include:` takes exactly one filespec, then optional trailing
  /// space and comment, then end of line.
  pub(super) fn parse_include(&mut self, scope: &Scope<'_, 's, T>) -> Result<()> {
    let state = Permit::NONE;

    let (mut last, mut kind) = self.shift(scope, state)?;
    // accept space between include: and the file name
    if kind == TokenKind::Space {
      self.reduce(last);
      (last, kind) = self.shift(scope, state)?;
    }
    if !kind.is_value() {
      return Err(self.error_at(
        ErrorKind::Semantic,
        last,
        "include: directive takes a file name",
      ));
    }
    let value = last;

    // accept space and comment after the file name
    (last, kind) = self.shift(scope, state)?;
    if kind == TokenKind::Space {
      self.reduce(last);
      (last, kind) = self.shift(scope, state)?;
    }
    if kind == TokenKind::Comment {
      self.reduce(last);
      (last, kind) = self.shift(scope, state)?;
    }
    if kind != TokenKind::LineFeed && kind != TokenKind::Eof {
      return Err(self.error_at(
        ErrorKind::Semantic,
        last,
        "include: directive takes only a file name",
      ));
    }
    self.unshift();

    let filespec = {
      let file = self.file();
      let token = &file.tokens[value];
      let (first, size) = match token.kind {
        // no escape processing inside file names
        TokenKind::QuotedValue => (token.first + 1, token.size - 2),
        _ => (token.first, token.size),
      };
      String::from_utf8_lossy(&file.data[first..first + size]).into_owned()
    };

    self.include_filespec(scope, &filespec, value)?;
    self.reduce(value);
    Ok(())
  }

  /// Expand the filespec and include every regular file it matches.
  fn include_filespec(
    &mut self,
    scope: &Scope<'_, 's, T>,
    filespec: &str,
    directive: usize,
  ) -> Result<()> {
    let matches = glob::Glob::open(filespec).map_err(|e| self.glob_error(directive, e))?;
    for entry in matches {
      let entry = entry.map_err(|e| self.glob_error(directive, e))?;
      if entry.kind == EntryKind::Regular {
        self.include_file(scope, &entry.path, directive)?;
      }
    }
    Ok(())
  }

  /// Parse one included file as a file scope whose virtual root
  /// continues the grammar of the option/section enclosing the
  /// directive.
  fn include_file(
    &mut self,
    scope: &Scope<'_, 's, T>,
    path: &Path,
    directive: usize,
  ) -> Result<()> {
    self.check_recursion_limit()?;
    if self.files.len() >= MAX_INCLUDE_DEPTH {
      return Err(self.error_at(
        ErrorKind::Semantic,
        directive,
        "maximum include depth exceeded",
      ));
    }

    let file = File::open(path)?;
    if self
      .files
      .iter()
      .any(|includer| includer.path.is_some() && includer.path == file.path)
    {
      return Err(self.error_at(
        ErrorKind::Semantic,
        directive,
        format!("circular include in {}", file.name),
      ));
    }

    let children = scope
      .encloser
      .map(|encloser| encloser.node.children())
      .unwrap_or(&[]);

    self.files.push(file);
    let root = Scope::root(children);
    let result = self.parse_file(&root);
    self.files.pop();
    result
  }

  fn glob_error(&self, directive: usize, error: glob::Error) -> crate::Error {
    let kind = match error {
      glob::Error::NoAccess(_) => ErrorKind::NoAccess,
      glob::Error::NoSuchFile(_) => ErrorKind::NoSuchFile,
      glob::Error::BadParameter => ErrorKind::BadParameter,
    };
    self.error_at(kind, directive, error.to_string())
  }
}
