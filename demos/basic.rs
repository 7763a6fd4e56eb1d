//! The smallest possible driver: a static schema, a string input,
//! and accepted values printed as they arrive.

use opal::{Lexeme, Opt};

fn print(node: &Opt<()>, lexeme: &Lexeme<'_>, _: &mut ()) -> i32 {
  println!("token: {}, value: '{}'", node.pattern(), lexeme.text());
  0
}

fn main() {
  let schema = vec![Opt::section(
    "baz",
    vec![
      Opt::option("foo").on_accept(print),
      Opt::option("bar").on_accept(print),
    ],
  )];

  let source = "baz:\n  foo: \"foo bar\"\n  bar: baz";
  match opal::parse_options(&schema, source, &mut ()) {
    Ok(()) => println!("return code: 0"),
    Err(error) => println!("{error}"),
  }
}
