// Collation tailoring rule compiler
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of tailor.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Command-line rule compiler.
//!
//! Reads a single rule string from `INPUT` and writes its LDML
//!   representation to standard out or the file named by `-o`.

extern crate tailor;

use getopts::{Fail, Options};
use std::{
    env,
    error::Error,
    fmt::{self, Display},
    fs,
    io::{self, Write},
};
use tailor::{
    collation::{Base, Collation, DEFAULT_BASE_TYPE},
    compile::{self, CompileOptions, Compiler},
    diagnose::{Reporter, VisualReporter},
};
use tracing_subscriber::EnvFilter;

/// What is to be compiled and where it goes.
#[derive(Debug, PartialEq, Eq)]
struct Job {
    input: String,
    output: Option<String>,
    kind: String,
    base: Option<Base>,
    fragment: bool,
    spaces: Option<usize>,
}

/// Types of commands
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Compile(Job),
    Usage,
}

/// Compile the rule string of `job.input`.
///
/// Compilation errors are reported to standard error against the rule
///   string before being returned.
fn compile(job: &Job) -> Result<(), TailorcError> {
    let source = fs::read_to_string(&job.input)?;

    let opts = match job.spaces {
        Some(n) => CompileOptions::default().with_spaces(n),
        None => CompileOptions::default(),
    };

    let result = if job.fragment {
        Compiler::new(opts).compile(&source)
    } else {
        let collation = Collation::new(job.kind.as_str(), opts);
        let mut collation = match &job.base {
            Some(base) => collation.with_base(base.clone()),
            None => collation,
        };

        collation.render([source.as_str()])
    };

    let out = match result {
        Ok(out) => out,
        Err(e) => {
            // Rendering to a string ensures buffering so that we don't
            //   interleave output between processes.
            let report = VisualReporter::new(job.input.as_str(), &source)
                .render(&e)
                .to_string();
            eprint!("{report}");

            return Err(e.into());
        }
    };

    match &job.output {
        Some(path) => fs::write(path, out)?,
        None => io::stdout().lock().write_all(out.as_bytes())?,
    }

    Ok(())
}

/// Entrypoint for the compiler
pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = &args[0];
    let opts = get_opts();
    let usage = opts.usage(&format!("Usage: {} [OPTIONS] INPUT", program));

    match parse_options(opts, args) {
        Ok(Command::Compile(job)) => match compile(&job) {
            Ok(()) => std::process::exit(exitcode::OK),
            Err(TailorcError::Compile(_)) => {
                eprintln!("fatal: failed to compile `{}`", job.input);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("fatal: {}: {e}", job.input);
                std::process::exit(1);
            }
        },
        Ok(Command::Usage) => {
            println!("{}", usage);
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("{}", e);
            println!("{}", usage);
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("o", "output", "set output file name", "NAME");
    opts.optopt("t", "type", "set collation type", "TYPE");
    opts.optopt("b", "base", "derive from the collation of LOCALE", "LOCALE");
    opts.optopt("", "base-type", "set collation type of base", "TYPE");
    opts.optopt("s", "spaces", "indent using N spaces", "N");
    opts.optflag("", "fragment", "emit only the rules fragment");
    opts.optflag("h", "help", "print this help menu");
    opts
}

/// Option parser
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, Fail> {
    let matches = opts.parse(&args[1..])?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    let input = match matches.free.len() {
        0 => return Err(Fail::OptionMissing(String::from("INPUT"))),
        1 => matches.free[0].clone(),
        _ => return Err(Fail::UnrecognizedOption(matches.free[1].clone())),
    };

    let base_kind = matches.opt_str("base-type");
    let base = match (matches.opt_str("b"), base_kind) {
        (Some(locale), kind) => Some(
            Base::new(locale)
                .with_kind(kind.unwrap_or_else(|| DEFAULT_BASE_TYPE.into())),
        ),
        (None, Some(_)) => {
            return Err(Fail::OptionMissing(String::from("--base")))
        }
        (None, None) => None,
    };

    let spaces = match matches.opt_str("s") {
        Some(n) => match n.parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                return Err(Fail::UnrecognizedOption(format!("--spaces {n}")))
            }
        },
        None => None,
    };

    Ok(Command::Compile(Job {
        input,
        output: matches.opt_str("o"),
        kind: matches
            .opt_str("t")
            .unwrap_or_else(|| DEFAULT_BASE_TYPE.into()),
        base,
        fragment: matches.opt_present("fragment"),
        spaces,
    }))
}

/// Compiler (`tailorc`) error.
#[derive(Debug)]
pub enum TailorcError {
    Io(io::Error),
    Compile(compile::Error),
}

impl From<io::Error> for TailorcError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<compile::Error> for TailorcError {
    fn from(e: compile::Error) -> Self {
        Self::Compile(e)
    }
}

impl Display for TailorcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => Display::fmt(e, f),
            Self::Compile(e) => Display::fmt(e, f),
        }
    }
}

impl Error for TailorcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Compile(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(argv: &[&str]) -> Vec<String> {
        std::iter::once("program")
            .chain(argv.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parse_options_help() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["-h"]));

        match result {
            Ok(Command::Usage) => {}
            _ => panic!("Help option did not parse"),
        }
    }

    #[test]
    fn parse_options_help_long() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["--help"]));

        match result {
            Ok(Command::Usage) => {}
            _ => panic!("Long help option did not parse"),
        }
    }

    #[test]
    fn parse_options_invalid() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["-q"]));

        match result {
            Err(Fail::UnrecognizedOption(_)) => {}
            _ => panic!("Invalid option not caught"),
        }
    }

    #[test]
    fn parse_options_missing_input() {
        let opts = get_opts();
        let result = parse_options(opts, args(&[]));

        match result {
            Err(Fail::OptionMissing(message)) => {
                assert_eq!("INPUT", message);
            }
            _ => panic!("Missing input not caught"),
        }
    }

    #[test]
    fn parse_options_too_many_args() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["foo", "-t", "bar", "baz"]));

        match result {
            Err(Fail::UnrecognizedOption(message)) => {
                assert_eq!("baz", message);
            }
            _ => panic!("Extra option not caught"),
        }
    }

    #[test]
    fn parse_options_defaults() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["de.txt"]));

        assert_eq!(
            Ok(Command::Compile(Job {
                input: "de.txt".into(),
                output: None,
                kind: "standard".into(),
                base: None,
                fragment: false,
                spaces: None,
            })),
            result,
        );
    }

    #[test]
    fn parse_options_valid() {
        let opts = get_opts();
        let result = parse_options(
            opts,
            args(&[
                "de.txt",
                "-o",
                "de.xml",
                "-t",
                "phonebook",
                "-b",
                "de",
                "--base-type",
                "search",
                "-s",
                "4",
            ]),
        );

        assert_eq!(
            Ok(Command::Compile(Job {
                input: "de.txt".into(),
                output: Some("de.xml".into()),
                kind: "phonebook".into(),
                base: Some(Base::new("de").with_kind("search")),
                fragment: false,
                spaces: Some(4),
            })),
            result,
        );
    }

    #[test]
    fn parse_options_base_defaults_to_standard() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["de.txt", "-b", "de"]));

        match result {
            Ok(Command::Compile(Job { base: Some(base), .. })) => {
                assert_eq!(Base::new("de"), base);
                assert_eq!("standard", base.kind);
            }
            _ => panic!("Base not parsed"),
        }
    }

    #[test]
    fn parse_options_base_type_requires_base() {
        let opts = get_opts();
        let result =
            parse_options(opts, args(&["de.txt", "--base-type", "search"]));

        match result {
            Err(Fail::OptionMissing(message)) => {
                assert_eq!("--base", message);
            }
            _ => panic!("Missing base not caught"),
        }
    }

    #[test]
    fn parse_options_invalid_spaces() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["de.txt", "-s", "many"]));

        match result {
            Err(Fail::UnrecognizedOption(message)) => {
                assert_eq!("--spaces many", message);
            }
            _ => panic!("Invalid spaces not caught"),
        }
    }

    #[test]
    fn parse_options_fragment() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["de.txt", "--fragment"]));

        match result {
            Ok(Command::Compile(Job { fragment: true, .. })) => {}
            _ => panic!("Fragment flag not parsed"),
        }
    }
}
