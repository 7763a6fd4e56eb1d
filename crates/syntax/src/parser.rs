#![deny(unused_must_use)]

//! The recursive descent parser: four mutually recursive loops over
//! the token stack, a scope chain pinned to indent tokens, and the
//! callback dispatch.

use std::path::Path;

use beef::lean::Cow;
use span::Span;

use crate::file::File;
use crate::schema::{self, Lexeme, Opt};
use crate::scope::{Depth, Scope, ScopeNode};
use crate::token::{Permit, TokenKind};
use crate::{Error, ErrorKind, Result};

/// Parse a byte string against `options`, delivering events to
/// `context`.
pub fn parse<'s, T>(options: &'s [Opt<T>], source: &'s [u8], context: &mut T) -> Result<()> {
  schema::validate(options)?;
  let root = Scope::root(options);
  let mut parser = Parser::new(File::from_bytes(source), context);
  parser.parse_file(&root)
}

/// Parse the file at `path` against `options`, delivering events to
/// `context`.
pub fn parse_file<'s, T>(options: &'s [Opt<T>], path: &Path, context: &mut T) -> Result<()> {
  schema::validate(options)?;
  let root = Scope::root(options);
  let mut parser = Parser::new(File::open(path)?, context);
  parser.parse_file(&root)
}

/// Included files may nest at most this deep.
pub(crate) const MAX_INCLUDE_DEPTH: usize = 32;

// A single parse_xxx() frame together with its scope and scanner
// calls consumes a few hundred bytes of stack; nested sections and
// include chains both recurse. 64k of headroom covers the deepest
// dive between checks.
#[cfg(feature = "check-recursion-limit")]
const MINIMUM_STACK_REQUIRED: usize = 64_000;

pub(crate) struct Parser<'s, 'c, T> {
  /// The file stack: the outermost input first, the innermost
  /// include last. The stack order is the includer chain.
  pub(crate) files: Vec<File<'s, T>>,
  pub(crate) context: &'c mut T,
}

impl<'s, 'c, T> Parser<'s, 'c, T> {
  pub(crate) fn new(file: File<'s, T>, context: &'c mut T) -> Self {
    Parser {
      files: vec![file],
      context,
    }
  }

  #[inline]
  pub(crate) fn file(&self) -> &File<'s, T> {
    self.files.last().unwrap()
  }

  #[inline]
  pub(crate) fn file_mut(&mut self) -> &mut File<'s, T> {
    self.files.last_mut().unwrap()
  }

  /// Advance the cursor, scanning a fresh token when the cursor is
  /// at the end of the stack. Returns the token's index and kind.
  fn shift(&mut self, scope: &Scope<'_, 's, T>, state: Permit) -> Result<(usize, TokenKind)> {
    if self.file().last == self.file().tokens.len() {
      self.scan(scope, state)?;
    }

    let file = self.file_mut();
    debug_assert!(file.last < file.tokens.len());
    let index = file.last;
    file.last += 1;
    Ok((index, file.tokens[index].kind))
  }

  /// Return the current token to the stream, so that an enclosing
  /// scope can retry it.
  fn unshift(&mut self) {
    let file = self.file_mut();
    debug_assert!(file.last > 1);
    file.last -= 1;
  }

  /// Drop the token at `index`, fixing up the cursor and the
  /// latest-indent index. Pinned scope indents are never reduced
  /// while their scope lives.
  fn reduce(&mut self, index: usize) {
    let file = self.file_mut();
    debug_assert!(index > 0 && index < file.last);
    file.tokens.remove(index);
    debug_assert_ne!(file.indent, index);
    if file.indent > index {
      file.indent -= 1;
    }
    file.last -= 1;
  }

  /// Byte-prefix agreement between two indent tokens: the shorter
  /// must be a literal prefix of the longer, so tabs and spaces may
  /// mix as long as each level extends its parent's exact bytes.
  fn is_indent(&self, outer: usize, inner: usize) -> bool {
    let file = self.file();
    let a = &file.tokens[outer];
    let b = &file.tokens[inner];
    let size = a.size.min(b.size);
    file.data[a.first..a.first + size] == file.data[b.first..b.first + size]
  }

  /// Depth of the indent at `inner` relative to the pin at `outer`.
  fn in_scope(&self, outer: usize, inner: usize) -> Depth {
    let file = self.file();
    match file.tokens[inner].size.cmp(&file.tokens[outer].size) {
      std::cmp::Ordering::Less => Depth::Shallower,
      std::cmp::Ordering::Equal => Depth::Equal,
      std::cmp::Ordering::Greater => Depth::Deeper,
    }
  }

  /// Pin this scope's indent on its first indented line: the line
  /// must strictly deepen and byte-prefix-extend the encloser's
  /// indent. True when the scope has a pin, old or new, afterwards.
  fn try_pin_indent(&self, scope: &Scope<'_, 's, T>) -> bool {
    if scope.indent.get() != 0 {
      return true;
    }
    let latest = self.file().indent;
    if latest != 0
      && self.in_scope(scope.encloser_indent(), latest) == Depth::Deeper
      && self.is_indent(scope.encloser_indent(), latest)
    {
      scope.indent.set(latest);
      return true;
    }
    false
  }

  /// At a line feed: a recorded indent that neither this scope nor
  /// its encloser pinned belongs to a blank or comment-only line and
  /// is dropped.
  fn discard_line_indent(&mut self, scope: &Scope<'_, 's, T>) {
    let latest = self.file().indent;
    self.file_mut().indent = 0;
    if latest != 0 && latest != scope.indent.get() && latest != scope.encloser_indent() {
      self.reduce(latest);
    }
  }

  pub(crate) fn error_here(
    &self,
    kind: ErrorKind,
    message: impl Into<Cow<'static, str>>,
    span: impl Into<Span>,
  ) -> Error {
    let file = self.file();
    Error::new(kind, message, file.name.clone(), file.location, span)
  }

  pub(crate) fn error_at(
    &self,
    kind: ErrorKind,
    index: usize,
    message: impl Into<Cow<'static, str>>,
  ) -> Error {
    let file = self.file();
    let token = &file.tokens[index];
    Error::new(kind, message, file.name.clone(), token.location, token.span())
  }

  #[cfg(feature = "check-recursion-limit")]
  fn check_recursion_limit(&self) -> Result<()> {
    if stacker::remaining_stack()
      .map(|available| available > MINIMUM_STACK_REQUIRED)
      .unwrap_or(true)
    {
      Ok(())
    } else {
      let first = self.file().first;
      Err(self.error_here(ErrorKind::Semantic, "nesting limit reached", (first, first)))
    }
  }

  #[cfg(not(feature = "check-recursion-limit"))]
  fn check_recursion_limit(&self) -> Result<()> {
    Ok(())
  }

  /// Fire a scope's hook with the identifier lexeme. The lexeme
  /// includes the trailing `:`/`=` discriminator byte.
  fn hook(
    &mut self,
    scope: &Scope<'_, 's, T>,
    select: impl Fn(&Opt<T>) -> Option<schema::Hook<T>>,
  ) -> Result<()> {
    let Some(node) = scope.node.as_node() else {
      return Ok(());
    };
    let Some(hook) = select(node) else {
      return Ok(());
    };

    let file = self.files.last().unwrap();
    let token = &file.tokens[scope.identifier];
    debug_assert!(token.kind.is_identifier());
    let lexeme = Lexeme::new(
      &file.name,
      token.location,
      &file.data[token.first..token.first + token.size],
    );

    let code = hook(node, &lexeme, &mut *self.context);
    if code < 0 {
      return Err(Error::new(
        ErrorKind::Callback(code),
        "callback aborted parsing",
        file.name.clone(),
        token.location,
        token.span(),
      ));
    }
    Ok(())
  }

  fn enter_scope(&mut self, scope: &Scope<'_, 's, T>) -> Result<()> {
    self.hook(scope, |node| node.enter)
  }

  /// Fire the exit hook, then release the scope's pinned indent
  /// token so the stack cannot grow without bound.
  fn exit_scope(&mut self, scope: &Scope<'_, 's, T>) -> Result<()> {
    let result = self.hook(scope, |node| node.exit);
    let pin = scope.indent.get();
    if pin > scope.encloser_indent() {
      self.reduce(pin);
    }
    result
  }

  /// Deliver a value to the scope's accept hook. Quoted values lose
  /// their surrounding quotes; escapes are passed through untouched.
  fn accept(&mut self, scope: &Scope<'_, 's, T>, index: usize) -> Result<()> {
    let Some(node) = scope.node.as_node() else {
      return Ok(());
    };
    let Some(hook) = node.accept else {
      return Ok(());
    };

    let file = self.files.last().unwrap();
    let token = &file.tokens[index];
    let (first, size) = match token.kind {
      TokenKind::QuotedValue => (token.first + 1, token.size - 2),
      _ => (token.first, token.size),
    };
    let lexeme = Lexeme::new(&file.name, token.location, &file.data[first..first + size]);

    let code = hook(node, &lexeme, &mut *self.context);
    if code < 0 {
      return Err(Error::new(
        ErrorKind::Callback(code),
        "callback aborted parsing",
        file.name.clone(),
        token.location,
        token.span(),
      ));
    }
    Ok(())
  }

  /// Open a child scope for an identifier token and run the matching
  /// sub-parser.
  fn dispatch(&mut self, scope: &Scope<'_, 's, T>, index: usize, kind: TokenKind) -> Result<()> {
    match kind {
      TokenKind::Include => {
        let enclosed = Scope::enclosed(scope, index, ScopeNode::Include);
        self.parse_include(&enclosed)
      }
      TokenKind::Section | TokenKind::Option => {
        let node = self.file().tokens[index]
          .node
          .expect("identifier token without a schema node");
        let enclosed = Scope::enclosed(scope, index, ScopeNode::Node(node));
        if kind == TokenKind::Section {
          self.parse_section(&enclosed)
        } else {
          self.parse_option(&enclosed)
        }
      }
      _ => unreachable!("suboptions dispatch from the option loop"),
    }
  }

  /// The file scope: top-level sections, options, and includes. No
  /// indentation is permitted at this level.
  pub(crate) fn parse_file(&mut self, scope: &Scope<'_, 's, T>) -> Result<()> {
    let mut indent = false;
    let state = Permit {
      option: true,
      ..Permit::NONE
    };

    loop {
      let (last, kind) = self.shift(scope, state)?;
      match kind {
        TokenKind::Eof => {
          self.discard_line_indent(scope);
          return self.exit_scope(scope);
        }
        TokenKind::Space if indent => {
          self.file_mut().indent = last;
          continue; // retain indentation
        }
        TokenKind::Space | TokenKind::Comment => self.reduce(last),
        TokenKind::LineFeed => {
          self.reduce(last);
          self.discard_line_indent(scope);
        }
        TokenKind::Option | TokenKind::Section | TokenKind::Include => {
          if self.file().indent != 0 {
            return Err(self.error_at(ErrorKind::Semantic, last, "no indentation at file level"));
          }
          self.dispatch(scope, last, kind)?;
          self.reduce(last);
        }
        _ => return Err(self.error_at(ErrorKind::Semantic, last, "syntax error")),
      }
      indent = kind == TokenKind::LineFeed;
    }
  }

  /// A section scope: nothing but enclosed sections, options and
  /// includes, each on its own line at this section's indent.
  fn parse_section(&mut self, scope: &Scope<'_, 's, T>) -> Result<()> {
    self.check_recursion_limit()?;
    let mut indent = false;
    let mut state = Permit::NONE;

    self.enter_scope(scope)?;
    loop {
      let (last, kind) = self.shift(scope, state)?;
      match kind {
        TokenKind::Eof => {
          self.unshift();
          return self.exit_scope(scope);
        }
        TokenKind::Space if indent => {
          self.file_mut().indent = last;
          continue; // retain indentation
        }
        TokenKind::Space | TokenKind::Comment => self.reduce(last),
        TokenKind::LineFeed => {
          self.reduce(last);
          self.discard_line_indent(scope);
          state.option = true;
        }
        TokenKind::Option | TokenKind::Section | TokenKind::Include => {
          if !self.try_pin_indent(scope) {
            // the identifier does not deepen this section, so it
            // belongs to an enclosing scope
            self.unshift();
            return self.exit_scope(scope);
          }
          if !self.is_indent(scope.indent.get(), self.file().indent) {
            return Err(self.error_at(ErrorKind::Syntax, last, "invalid indentation"));
          }
          match self.in_scope(scope.indent.get(), self.file().indent) {
            Depth::Shallower => {
              self.unshift();
              return self.exit_scope(scope);
            }
            Depth::Deeper => {
              return Err(self.error_at(ErrorKind::Syntax, last, "invalid indentation"));
            }
            Depth::Equal => self.dispatch(scope, last, kind)?,
          }
          self.reduce(last);
        }
        _ => return Err(self.error_at(ErrorKind::Syntax, last, "syntax error")),
      }
      indent = kind == TokenKind::LineFeed;
    }
  }

  /// An option scope: values and suboptions on the option's line,
  /// then continuation lines pinned to a deeper indent.
  fn parse_option(&mut self, scope: &Scope<'_, 's, T>) -> Result<()> {
    self.check_recursion_limit()?;
    let mut indent = false;
    let mut newline = false;
    let mut state = Permit {
      suboption: true,
      value: true,
      option: false,
    };

    self.enter_scope(scope)?;
    loop {
      let (last, kind) = self.shift(scope, state)?;
      match kind {
        TokenKind::Eof | TokenKind::Option | TokenKind::Section | TokenKind::Include => {
          self.unshift();
          return self.exit_scope(scope);
        }
        TokenKind::Space if indent => {
          self.file_mut().indent = last;
          continue; // retain indentation
        }
        TokenKind::Space | TokenKind::Comment => self.reduce(last),
        TokenKind::LineFeed => {
          self.reduce(last);
          self.discard_line_indent(scope);
          state.option = true;
          newline = true;
        }
        TokenKind::Suboption => {
          if newline {
            self.try_pin_indent(scope);
            if !self.is_indent(scope.indent.get(), self.file().indent) {
              return Err(self.error_at(ErrorKind::Syntax, last, "bad indent"));
            }
            if self.in_scope(scope.indent.get(), self.file().indent) != Depth::Equal {
              return Err(self.error_at(ErrorKind::Semantic, last, "bad indent"));
            }
          }
          let node = self.file().tokens[last]
            .node
            .expect("suboption token without a schema node");
          let enclosed = Scope::enclosed(scope, last, ScopeNode::Node(node));
          self.parse_suboption(&enclosed)?;
          // suboptions follow (optional) values
          state.option = false;
          state.value = false;
          self.reduce(last);
        }
        TokenKind::Value | TokenKind::QuotedValue => {
          if !state.value {
            return Err(self.error_at(ErrorKind::Semantic, last, "unexpected literal"));
          }
          if newline {
            self.try_pin_indent(scope);
            if self.in_scope(scope.indent.get(), self.file().indent) != Depth::Equal {
              return Err(self.error_at(ErrorKind::Semantic, last, "scope did not match"));
            }
          }
          self.accept(scope, last)?;
          state.option = false;
          self.reduce(last);
        }
      }
      indent = kind == TokenKind::LineFeed;
    }
  }

  /// A suboption scope: at most one value.
  fn parse_suboption(&mut self, scope: &Scope<'_, 's, T>) -> Result<()> {
    let state = Permit {
      value: true,
      ..Permit::NONE
    };

    self.enter_scope(scope)?;
    let (last, kind) = self.shift(scope, state)?;
    match kind {
      TokenKind::Value | TokenKind::QuotedValue => {
        self.accept(scope, last)?;
        self.reduce(last);
      }
      // no value; the token belongs to the enclosing option
      _ => self.unshift(),
    }
    self.exit_scope(scope)
  }
}

mod include;
