//! The scanner: turns bytes into tokens, one per call, consulting
//! the live scope chain and the parser's permitted-state mask to
//! decide what an identifier is.

use crate::chars::{self, classify};
use crate::parser::Parser;
use crate::schema::{Opt, OptKind};
use crate::scope::Scope;
use crate::token::{Permit, TokenKind};
use crate::{ErrorKind, Result};

/// The reserved word introducing an include directive.
const INCLUDE_KEYWORD: &[u8] = b"include";

impl<'s, 'c, T> Parser<'s, 'c, T> {
  /// Produce exactly one token and append it to the current file's
  /// token stack.
  pub(crate) fn scan(&mut self, scope: &Scope<'_, 's, T>, state: Permit) -> Result<TokenKind> {
    let first = self.file().first;
    let mut last = first;

    if last == self.file().data.len() {
      self.file_mut().refill()?;
      if last == self.file().data.len() {
        return Ok(self.file_mut().push_token(TokenKind::Eof, first, last, None));
      }
    }

    if self.file().data[last] == b'"' {
      return self.scan_quoted_value();
    }
    let mut class = classify(self.file().data[last]);
    if class == chars::INVALID {
      return Err(self.error_here(ErrorKind::Syntax, "invalid character", (last, last + 1)));
    }

    last += 1;
    loop {
      if last == self.file().data.len() {
        self.file_mut().refill()?;
        if last == self.file().data.len() {
          break;
        }
      }

      match class {
        chars::SPACE => last = self.skip(last, |class, _| class == chars::SPACE),
        chars::COMMENT => last = self.skip(last, |class, byte| class > 0 && byte != b'\n'),
        chars::LINE_FEED => break,
        chars::IDENT => {
          last = self.skip(last, |class, _| class == chars::IDENT);
          if last == self.file().data.len() && !self.file().empty() {
            continue; // refill and keep extending the identifier
          }
          if last == self.file().data.len() {
            // nothing can follow, so no discriminator: a plain value
            return Ok(self.file_mut().push_token(TokenKind::Value, first, last, None));
          }

          // the next byte decides; an accepted `:`/`=` discriminator
          // becomes part of the token
          if let Some((kind, node)) = self.resolve_identifier(scope, state, first, last) {
            return Ok(self.file_mut().push_token(kind, first, last + 1, node));
          }

          class = chars::VALUE;
          last = self.skip(last, |class, byte| class >= chars::IDENT && byte != b'"');
        }
        _ => {
          debug_assert_eq!(class, chars::VALUE);
          last = self.skip(last, |class, byte| class >= chars::IDENT && byte != b'"');
        }
      }

      if last != self.file().data.len() {
        break;
      }
    }

    let kind = match class {
      chars::SPACE => TokenKind::Space,
      chars::LINE_FEED => TokenKind::LineFeed,
      chars::COMMENT => TokenKind::Comment,
      _ => TokenKind::Value,
    };
    Ok(self.file_mut().push_token(kind, first, last, None))
  }

  /// Greedy run from `at` while `keep(class, byte)` holds.
  fn skip(&self, mut at: usize, keep: impl Fn(i8, u8) -> bool) -> usize {
    let data = &self.file().data;
    while at < data.len() && keep(classify(data[at]), data[at]) {
      at += 1;
    }
    at
  }

  /// Scan a `"`-delimited value. The quotes are part of the token;
  /// backslash escapes the closing-quote check for the next byte.
  fn scan_quoted_value(&mut self) -> Result<TokenKind> {
    let first = self.file().first;
    let mut last = first;
    debug_assert_eq!(self.file().data[last], b'"');

    last += 1;
    let mut escaped = false;
    loop {
      if last == self.file().data.len() {
        self.file_mut().refill()?;
        if last == self.file().data.len() {
          return Err(self.error_here(
            ErrorKind::Syntax,
            "unterminated quoted value",
            (first, last),
          ));
        }
      } else {
        let byte = self.file().data[last];
        if byte == b'\n' {
          return Err(self.error_here(
            ErrorKind::Syntax,
            "line feed in quoted value",
            (first, last),
          ));
        }
        if byte == b'"' && !escaped {
          break;
        }
        escaped = byte == b'\\' && !escaped;
        last += 1;
      }
    }

    Ok(
      self
        .file_mut()
        .push_token(TokenKind::QuotedValue, first, last + 1, None),
    )
  }

  /// Decide what an identifier run is, from the byte that follows it
  /// and the schema reachable from the current scope.
  fn resolve_identifier(
    &self,
    scope: &Scope<'_, 's, T>,
    state: Permit,
    first: usize,
    last: usize,
  ) -> Option<(TokenKind, Option<&'s Opt<T>>)> {
    let file = self.file();
    let name = &file.data[first..last];

    match file.data[last] {
      b':' if state.option => {
        if name == INCLUDE_KEYWORD {
          return Some((TokenKind::Include, None));
        }
        let node = self.resolve_option(scope, name)?;
        let kind = match node.kind() {
          OptKind::Section => TokenKind::Section,
          _ => TokenKind::Option,
        };
        Some((kind, Some(node)))
      }
      b'=' if state.suboption => {
        let node = scope.node.find_suboption(name)?;
        Some((TokenKind::Suboption, Some(node)))
      }
      _ => None,
    }
  }

  /// Search outward through the scope chain for the scope the
  /// current indent belongs to, and look `name` up in its schema
  /// node. Indentation is a literal byte prefix, not a width count.
  fn resolve_option(&self, scope: &Scope<'_, 's, T>, name: &[u8]) -> Option<&'s Opt<T>> {
    let file = self.file();
    let inner = file.indent;
    let mut scope = scope;

    // a scope that has not pinned its indent yet inherits its
    // encloser's bound: anything deeper opens this scope's first
    // child
    if scope.encloser.is_some() && scope.indent.get() == 0 {
      let outer = scope.encloser_indent();
      if file.tokens[outer].size < file.tokens[inner].size {
        if !self.indent_prefix_eq(outer, inner) {
          return None;
        }
        return scope.node.find_option(name);
      }
      scope = scope.encloser.unwrap();
    }

    while let Some(encloser) = scope.encloser {
      let outer = scope.indent.get();
      debug_assert_ne!(outer, 0);
      if file.tokens[outer].size <= file.tokens[inner].size {
        if !self.indent_prefix_eq(outer, inner) {
          return None;
        }
        return scope.node.find_option(name);
      }
      scope = encloser;
    }

    // file scope: only unindented identifiers resolve
    if file.tokens[inner].size == 0 {
      scope.node.find_option(name)
    } else {
      None
    }
  }

  /// True when the first `outer.size` bytes of both indent tokens
  /// agree.
  fn indent_prefix_eq(&self, outer: usize, inner: usize) -> bool {
    let file = self.file();
    let outer = &file.tokens[outer];
    let inner = &file.tokens[inner];
    debug_assert!(outer.size <= inner.size);
    file.data[outer.first..outer.first + outer.size]
      == file.data[inner.first..inner.first + outer.size]
  }
}

#[cfg(test)]
mod tests;
