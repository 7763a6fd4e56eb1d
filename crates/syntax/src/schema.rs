//! The schema a caller declares: which sections, options and
//! suboptions the configuration language recognizes, and which
//! callbacks fire as the parser walks them.

use beef::lean::Cow;
use span::Location;

use crate::chars;
use crate::{Error, Result};

/// What a schema node describes.
///
/// `Include` is the built-in `include:` directive; constructors never
/// produce it and the scanner recognizes the reserved word on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptKind {
  Section,
  Option,
  Suboption,
  Include,
}

/// A parse event callback.
///
/// Receives the schema node, the lexeme, and the caller's context.
/// A negative return aborts the parse and surfaces as
/// [`ErrorKind::Callback`][crate::ErrorKind::Callback].
pub type Hook<T> = fn(&Opt<T>, &Lexeme<'_>, &mut T) -> i32;

/// One node of the schema tree: a section, option, or suboption.
///
/// Sections contain sections and options; options contain
/// suboptions; suboptions are leaves. `T` is the context threaded to
/// every hook.
pub struct Opt<T> {
  kind: OptKind,
  pattern: Cow<'static, str>,
  children: Vec<Opt<T>>,
  pub(crate) enter: Option<Hook<T>>,
  pub(crate) exit: Option<Hook<T>>,
  pub(crate) accept: Option<Hook<T>>,
}

impl<T> Opt<T> {
  fn new(kind: OptKind, pattern: impl Into<Cow<'static, str>>, children: Vec<Opt<T>>) -> Opt<T> {
    Opt {
      kind,
      pattern: pattern.into(),
      children,
      enter: None,
      exit: None,
      accept: None,
    }
  }

  pub fn section(pattern: impl Into<Cow<'static, str>>, children: Vec<Opt<T>>) -> Opt<T> {
    Opt::new(OptKind::Section, pattern, children)
  }

  pub fn option(pattern: impl Into<Cow<'static, str>>) -> Opt<T> {
    Opt::new(OptKind::Option, pattern, Vec::new())
  }

  pub fn suboption(pattern: impl Into<Cow<'static, str>>) -> Opt<T> {
    Opt::new(OptKind::Suboption, pattern, Vec::new())
  }

  /// Attach suboptions to an option.
  pub fn suboptions(mut self, children: Vec<Opt<T>>) -> Self {
    self.children = children;
    self
  }

  /// Fired when the parser enters this node's scope. The lexeme is
  /// the identifier as scanned, including its trailing `:` or `=`.
  pub fn on_enter(mut self, hook: Hook<T>) -> Self {
    self.enter = Some(hook);
    self
  }

  /// Fired when the parser leaves this node's scope; same lexeme
  /// contract as [`Opt::on_enter`].
  pub fn on_exit(mut self, hook: Hook<T>) -> Self {
    self.exit = Some(hook);
    self
  }

  /// Fired for every value this node takes. Quoted values arrive
  /// without their quotes; escape sequences are passed through
  /// untouched.
  pub fn on_accept(mut self, hook: Hook<T>) -> Self {
    self.accept = Some(hook);
    self
  }

  pub fn kind(&self) -> OptKind {
    self.kind
  }

  pub fn pattern(&self) -> &str {
    self.pattern.as_ref()
  }

  pub fn children(&self) -> &[Opt<T>] {
    &self.children
  }

  pub(crate) fn matches(&self, name: &[u8]) -> bool {
    self.pattern.as_bytes() == name
  }
}

/// The text handed to a hook: which file it came from, where it
/// starts, and its exact bytes.
#[derive(Clone, Copy, Debug)]
pub struct Lexeme<'a> {
  pub file: &'a str,
  pub location: Location,
  bytes: &'a [u8],
}

impl<'a> Lexeme<'a> {
  pub(crate) fn new(file: &'a str, location: Location, bytes: &'a [u8]) -> Lexeme<'a> {
    Lexeme {
      file,
      location,
      bytes,
    }
  }

  pub fn bytes(&self) -> &'a [u8] {
    self.bytes
  }

  /// The lexeme as text. Input is not required to be UTF-8; invalid
  /// sequences are replaced.
  pub fn text(&self) -> std::borrow::Cow<'a, str> {
    String::from_utf8_lossy(self.bytes)
  }
}

impl std::fmt::Display for Lexeme<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.text())
  }
}

/// Reject schemas the scanner could never match before parsing
/// starts.
pub(crate) fn validate<T>(options: &[Opt<T>]) -> Result<()> {
  for node in options {
    if !matches!(node.kind, OptKind::Section | OptKind::Option) {
      return Err(Error::schema(format!(
        "top-level schema node `{}` must be a section or an option",
        node.pattern
      )));
    }
    validate_node(node)?;
  }
  Ok(())
}

fn validate_node<T>(node: &Opt<T>) -> Result<()> {
  if node.pattern.is_empty() {
    return Err(Error::schema("schema pattern is empty"));
  }
  if node
    .pattern
    .as_bytes()
    .iter()
    .any(|&b| chars::classify(b) != chars::IDENT)
  {
    return Err(Error::schema(format!(
      "schema pattern `{}` is not an identifier",
      node.pattern
    )));
  }
  if node.pattern.as_ref() == "include" && node.kind != OptKind::Suboption {
    return Err(Error::schema("schema pattern `include` is reserved"));
  }

  for child in &node.children {
    let allowed = match node.kind {
      OptKind::Section => matches!(child.kind, OptKind::Section | OptKind::Option),
      OptKind::Option => child.kind == OptKind::Suboption,
      OptKind::Suboption | OptKind::Include => false,
    };
    if !allowed {
      return Err(Error::schema(format!(
        "schema node `{}` may not contain `{}`",
        node.pattern, child.pattern
      )));
    }
    validate_node(child)?;
  }
  Ok(())
}
