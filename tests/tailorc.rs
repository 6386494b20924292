// Test tailorc command
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


use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::{fs, io::Write, process::Command};
use tempfile::NamedTempFile;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn rules_file(rules: &str) -> Result<NamedTempFile, std::io::Error> {
    let mut file = NamedTempFile::new()?;
    file.write_all(rules.as_bytes())?;

    Ok(file)
}

#[test]
fn compile_invalid_argument() -> TestResult {
    let mut cmd = Command::cargo_bin("tailorc")?;
    cmd.arg("-q");
    cmd.assert()
        .failure()
        .code(exitcode::USAGE)
        .stderr(predicate::str::contains("Unrecognized option:"));

    Ok(())
}

#[test]
fn compile_missing_input_file() -> TestResult {
    let mut cmd = Command::cargo_bin("tailorc")?;
    cmd.arg("-t").arg("phonebook");
    cmd.assert()
        .failure()
        .code(exitcode::USAGE)
        .stderr(predicate::str::contains("INPUT"));

    Ok(())
}

#[test]
fn compile_help() -> TestResult {
    let mut cmd = Command::cargo_bin("tailorc")?;
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--fragment"));

    Ok(())
}

#[test]
fn compile_input_file_does_not_exist() -> TestResult {
    let mut cmd = Command::cargo_bin("tailorc")?;
    cmd.arg("does-not-exist.txt");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist.txt"));

    Ok(())
}

#[test]
fn compile_to_stdout() -> TestResult {
    let input = rules_file("&a<b\n")?;

    let mut cmd = Command::cargo_bin("tailorc")?;
    cmd.arg(input.path());
    cmd.assert().success().stdout(
        "<collation type=\"standard\">\n\
         \t<rules>\n\
         \t\t<reset>a</reset>\n\
         \t\t<p>b</p>\n\
         \t</rules>\n\
         </collation>\n",
    );

    Ok(())
}

#[test]
fn compile_fragment_with_spaces() -> TestResult {
    let input = rules_file("&c<ch")?;

    let mut cmd = Command::cargo_bin("tailorc")?;
    cmd.arg(input.path()).arg("--fragment").arg("-s").arg("2");
    cmd.assert().success().stdout(
        "<rules>\n  \
         <reset>c</reset>\n  \
         <p>ch</p>\n\
         </rules>\n",
    );

    Ok(())
}

#[test]
fn compile_with_base_to_file() -> TestResult {
    let input = rules_file("&a<b")?;
    let dir = tempfile::tempdir()?;
    let dest = dir.path().join("out.xml");

    let mut cmd = Command::cargo_bin("tailorc")?;
    cmd.arg(input.path())
        .arg("-o")
        .arg(&dest)
        .arg("-t")
        .arg("phonebook")
        .arg("-b")
        .arg("de");
    cmd.assert().success().stdout("");

    let out = fs::read_to_string(&dest)?;
    assert!(out.starts_with(
        "<collation type=\"phonebook\">\n\
         \t<base>\n\
         \t\t<alias source=\"de\" type=\"standard\"/>\n\
         \t</base>\n"
    ));

    Ok(())
}

#[test]
fn compile_error_renders_diagnostic() -> TestResult {
    let input = rules_file("a<b")?;

    let mut cmd = Command::cargo_bin("tailorc")?;
    cmd.arg(input.path());
    cmd.assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains(
            "error: expected a strength operator before `a`",
        ))
        .stderr(predicate::str::contains(":1:1\n"))
        .stderr(predicate::str::contains(" 1 | a<b\n"))
        .stderr(predicate::str::contains("fatal: failed to compile"));

    Ok(())
}
