use crate::file::File;
use crate::parser::Parser;
use crate::schema::Opt;
use crate::scope::{Scope, ScopeNode};
use crate::token::Permit;
use crate::token::TokenKind::{self, *};
use crate::ErrorKind;

fn options() -> Permit {
  Permit {
    option: true,
    ..Permit::NONE
  }
}

fn suboptions() -> Permit {
  Permit {
    suboption: true,
    value: true,
    ..Permit::NONE
  }
}

/// Scan `source` to end of input at file scope, collecting token
/// kinds and lexemes.
fn scan_all(schema: &[Opt<()>], source: &[u8], state: Permit) -> Vec<(TokenKind, Vec<u8>)> {
  let mut context = ();
  let mut parser = Parser::new(File::from_bytes(source), &mut context);
  let root = Scope::root(schema);

  let mut tokens = Vec::new();
  loop {
    let kind = parser.scan(&root, state).unwrap();
    let file = parser.file();
    let token = file.tokens.last().unwrap();
    tokens.push((kind, file.data[token.first..token.first + token.size].to_vec()));
    if kind == Eof {
      break;
    }
  }
  tokens
}

fn scan_error(schema: &[Opt<()>], source: &[u8], state: Permit) -> crate::Error {
  let mut context = ();
  let mut parser = Parser::new(File::from_bytes(source), &mut context);
  let root = Scope::root(schema);
  loop {
    match parser.scan(&root, state) {
      Ok(Eof) => panic!("scanned to end of input without an error"),
      Ok(_) => {}
      Err(e) => return e,
    }
  }
}

#[test]
fn values_spaces_comments() {
  let tokens = scan_all(&[], b"one two # three\n", Permit::NONE);
  assert_eq!(
    tokens,
    vec![
      (Value, b"one".to_vec()),
      (Space, b" ".to_vec()),
      (Value, b"two".to_vec()),
      (Space, b" ".to_vec()),
      (Comment, b"# three".to_vec()),
      (LineFeed, b"\n".to_vec()),
      (Eof, vec![]),
    ]
  );
}

#[test]
fn carriage_return_is_whitespace() {
  let tokens = scan_all(&[], b"a\r\nb", Permit::NONE);
  assert_eq!(
    tokens,
    vec![
      (Value, b"a".to_vec()),
      (Space, b"\r".to_vec()),
      (LineFeed, b"\n".to_vec()),
      (Value, b"b".to_vec()),
      (Eof, vec![]),
    ]
  );
}

#[test]
fn known_option_keeps_its_discriminator() {
  let schema = vec![Opt::option("foo")];
  let tokens = scan_all(&schema, b"foo: bar", options());
  assert_eq!(
    tokens,
    vec![
      (Option, b"foo:".to_vec()),
      (Space, b" ".to_vec()),
      (Value, b"bar".to_vec()),
      (Eof, vec![]),
    ]
  );
}

#[test]
fn known_section_scans_as_section() {
  let schema = vec![Opt::section("zone", vec![Opt::option("file")])];
  let tokens = scan_all(&schema, b"zone:", options());
  assert_eq!(tokens, vec![(Section, b"zone:".to_vec()), (Eof, vec![])]);
}

#[test]
fn unknown_identifier_reclassifies_as_value() {
  let tokens = scan_all(&[], b"nope: bar", options());
  assert_eq!(
    tokens,
    vec![
      (Value, b"nope:".to_vec()),
      (Space, b" ".to_vec()),
      (Value, b"bar".to_vec()),
      (Eof, vec![]),
    ]
  );
}

#[test]
fn options_only_resolve_when_permitted() {
  let schema = vec![Opt::option("foo")];
  let tokens = scan_all(&schema, b"foo: 1", Permit::NONE);
  assert_eq!(tokens[0], (Value, b"foo:".to_vec()));
}

#[test]
fn include_keyword_is_reserved() {
  let tokens = scan_all(&[], b"include: extra.conf", options());
  assert_eq!(tokens[0], (Include, b"include:".to_vec()));

  // not where options are not permitted
  let tokens = scan_all(&[], b"include: extra.conf", Permit::NONE);
  assert_eq!(tokens[0], (Value, b"include:".to_vec()));
}

#[test]
fn suboption_resolution() {
  let schema = vec![Opt::option("foo").suboptions(vec![Opt::suboption("x")])];
  let root = Scope::root(&schema);
  let scope = Scope::enclosed(&root, 0, ScopeNode::Node(&schema[0]));

  let mut context = ();
  let mut parser = Parser::new(File::from_bytes(b"x=2 y=3"), &mut context);
  let mut tokens = Vec::new();
  loop {
    let kind = parser.scan(&scope, suboptions()).unwrap();
    let file = parser.file();
    let token = file.tokens.last().unwrap();
    tokens.push((kind, file.data[token.first..token.first + token.size].to_vec()));
    if kind == Eof {
      break;
    }
  }

  assert_eq!(
    tokens,
    vec![
      (Suboption, b"x=".to_vec()),
      (Value, b"2".to_vec()),
      (Space, b" ".to_vec()),
      // `y` is not a suboption of `foo`
      (Value, b"y=3".to_vec()),
      (Eof, vec![]),
    ]
  );
}

#[test]
fn dash_starts_a_value() {
  let tokens = scan_all(&[], b"-option", options());
  assert_eq!(tokens[0], (Value, b"-option".to_vec()));
}

#[test]
fn quoted_value_keeps_quotes_and_escapes() {
  let tokens = scan_all(&[], br#""foo \"bar\" baz" x"#, Permit::NONE);
  assert_eq!(tokens[0], (QuotedValue, br#""foo \"bar\" baz""#.to_vec()));
}

#[test]
fn quoted_value_stops_values() {
  let tokens = scan_all(&[], br#"abc"def""#, Permit::NONE);
  assert_eq!(
    tokens,
    vec![
      (Value, b"abc".to_vec()),
      (QuotedValue, br#""def""#.to_vec()),
      (Eof, vec![]),
    ]
  );
}

#[test]
fn unterminated_quoted_value() {
  let error = scan_error(&[], br#""abc"#, Permit::NONE);
  assert_eq!(error.kind, ErrorKind::Syntax);
  assert_eq!(error.message.as_ref(), "unterminated quoted value");
}

#[test]
fn line_feed_in_quoted_value() {
  let error = scan_error(&[], b"\"abc\ndef\"", Permit::NONE);
  assert_eq!(error.kind, ErrorKind::Syntax);
  assert_eq!(error.message.as_ref(), "line feed in quoted value");
  assert_eq!(error.location.line, 1);
}

#[test]
fn invalid_character() {
  let error = scan_error(&[], b"\x01", Permit::NONE);
  assert_eq!(error.kind, ErrorKind::Syntax);
  assert_eq!(error.message.as_ref(), "invalid character");
}

#[test]
fn locations_track_lines_and_columns() {
  let tokens = {
    let mut context = ();
    let mut parser = Parser::new(File::from_bytes(b"ab cd\nef"), &mut context);
    let root = Scope::root(&[]);
    let mut out = Vec::new();
    loop {
      let kind = parser.scan(&root, Permit::NONE).unwrap();
      let token = parser.file().tokens.last().unwrap();
      out.push((kind, token.location.line, token.location.column));
      if kind == Eof {
        break;
      }
    }
    out
  };

  assert_eq!(
    tokens,
    vec![
      (Value, 1, 1),
      (Space, 1, 3),
      (Value, 1, 4),
      (LineFeed, 1, 6),
      (Value, 2, 1),
      (Eof, 2, 3),
    ]
  );
}

#[test]
fn high_bit_bytes_are_values() {
  let tokens = scan_all(&[], b"caf\xc3\xa9 \xff", Permit::NONE);
  assert_eq!(
    tokens,
    vec![
      (Value, b"caf\xc3\xa9".to_vec()),
      (Space, b" ".to_vec()),
      (Value, b"\xff".to_vec()),
      (Eof, vec![]),
    ]
  );
}
