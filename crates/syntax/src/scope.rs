use std::cell::Cell;

use crate::schema::{Opt, OptKind};

/// How an indent relates to a scope's pinned indent, by length
/// alone. Byte-level prefix agreement is checked separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Depth {
  Shallower,
  Equal,
  Deeper,
}

/// What a scope is parsing.
pub(crate) enum ScopeNode<'s, T> {
  /// The virtual file scope: a section wrapping the top-level nodes.
  Root(&'s [Opt<T>]),
  Node(&'s Opt<T>),
  /// An `include:` directive. The built-in has no schema node.
  Include,
}

impl<'s, T> ScopeNode<'s, T> {
  pub fn kind(&self) -> OptKind {
    match self {
      ScopeNode::Root(_) => OptKind::Section,
      ScopeNode::Node(node) => node.kind(),
      ScopeNode::Include => OptKind::Include,
    }
  }

  pub fn children(&self) -> &'s [Opt<T>] {
    match self {
      ScopeNode::Root(nodes) => nodes,
      ScopeNode::Node(node) => node.children(),
      ScopeNode::Include => &[],
    }
  }

  pub fn as_node(&self) -> Option<&'s Opt<T>> {
    match self {
      ScopeNode::Node(node) => Some(node),
      _ => None,
    }
  }

  /// Sections (including the file root) resolve their options and
  /// sections by name; anything else resolves nothing.
  pub fn find_option(&self, name: &[u8]) -> Option<&'s Opt<T>> {
    if self.kind() != OptKind::Section {
      return None;
    }
    self.children().iter().find(|node| node.matches(name))
  }

  /// Options resolve their suboptions by name.
  pub fn find_suboption(&self, name: &[u8]) -> Option<&'s Opt<T>> {
    if self.kind() != OptKind::Option {
      return None;
    }
    self.children().iter().find(|node| node.matches(name))
  }
}

/// A parser stack frame: "we are inside option/section X". Lives on
/// the host call stack; the encloser links form the scope chain,
/// terminated by the file scope.
pub(crate) struct Scope<'a, 's, T> {
  pub encloser: Option<&'a Scope<'a, 's, T>>,
  /// Index of the pinned indent token on the owning file's token
  /// stack; 0 is the zero-length sentinel until the first indented
  /// line fixes it.
  pub indent: Cell<usize>,
  /// Index of the identifier token that opened this scope.
  pub identifier: usize,
  pub node: ScopeNode<'s, T>,
}

impl<'a, 's, T> Scope<'a, 's, T> {
  pub fn root(nodes: &'s [Opt<T>]) -> Scope<'a, 's, T> {
    Scope {
      encloser: None,
      indent: Cell::new(0),
      identifier: 0,
      node: ScopeNode::Root(nodes),
    }
  }

  pub fn enclosed(
    encloser: &'a Scope<'a, 's, T>,
    identifier: usize,
    node: ScopeNode<'s, T>,
  ) -> Scope<'a, 's, T> {
    Scope {
      encloser: Some(encloser),
      indent: Cell::new(0),
      identifier,
      node,
    }
  }

  /// The encloser's pinned indent index; the sentinel at file scope.
  pub fn encloser_indent(&self) -> usize {
    self.encloser.map(|scope| scope.indent.get()).unwrap_or(0)
  }
}
