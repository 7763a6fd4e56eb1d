//! Parse a server-style configuration file and print the event tree,
//! rendering parse errors as diagnostics.
//!
//! ```text
//! server:
//!   port: 5353
//!   interface: 127.0.0.1
//!
//! zone:
//!   name: example.com
//!   file: "db.example.com"
//!   notify: 10.0.0.2 delay=5 retry=2
//!
//! include: zones.d/*.conf
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use opal::{Error, Lexeme, Opt};

#[derive(Debug, Parser)]
#[clap(name = "server", version)]
struct Args {
  /// Configuration file to parse.
  config: PathBuf,
}

#[derive(Default)]
struct Printer {
  depth: usize,
}

fn enter(node: &Opt<Printer>, _lexeme: &Lexeme<'_>, printer: &mut Printer) -> i32 {
  println!("{:indent$}{}:", "", node.pattern(), indent = printer.depth * 2);
  printer.depth += 1;
  0
}

fn exit(_node: &Opt<Printer>, _lexeme: &Lexeme<'_>, printer: &mut Printer) -> i32 {
  printer.depth -= 1;
  0
}

fn accept(node: &Opt<Printer>, lexeme: &Lexeme<'_>, printer: &mut Printer) -> i32 {
  println!(
    "{:indent$}{} = {}",
    "",
    node.pattern(),
    lexeme.text(),
    indent = printer.depth * 2
  );
  0
}

fn option(pattern: &'static str) -> Opt<Printer> {
  Opt::option(pattern).on_enter(enter).on_exit(exit).on_accept(accept)
}

fn schema() -> Vec<Opt<Printer>> {
  vec![
    Opt::option("verbosity").on_accept(accept),
    Opt::section(
      "server",
      vec![option("port"), option("interface")],
    )
    .on_enter(enter)
    .on_exit(exit),
    Opt::section(
      "zone",
      vec![
        option("name"),
        option("file"),
        option("notify").suboptions(vec![
          Opt::suboption("delay").on_accept(accept),
          Opt::suboption("retry").on_accept(accept),
        ]),
      ],
    )
    .on_enter(enter)
    .on_exit(exit),
  ]
}

fn render(error: &Error) {
  match fs::read_to_string(&error.file) {
    Ok(source) => match error.report(&source).emit_to_string() {
      Ok(rendered) => eprint!("{rendered}"),
      Err(_) => eprintln!("{error}"),
    },
    Err(_) => eprintln!("{error}"),
  }
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  let mut printer = Printer::default();
  if let Err(error) = opal::parse_options_file(&schema(), &args.config, &mut printer) {
    render(&error);
    bail!("parsing {} failed", args.config.display());
  }
  Ok(())
}
