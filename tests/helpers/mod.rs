#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use fixlet_manager::Fixlet;

pub const HEADER: &str = "SiteID,FxiletID,Name,Criticality,RelevantComputerCount";

/// The two-row dataset used throughout the integration tests.
pub fn sample_fixlets() -> Vec<Fixlet> {
    vec![
        Fixlet::new(1, 100, "Patch A", "High", 5),
        Fixlet::new(2, 101, "Patch B", "Low", 2),
    ]
}

pub fn sample_csv() -> String {
    format!("{HEADER}\n1,100,Patch A,High,5\n2,101,Patch B,Low,2\n")
}

/// Write `contents` to `fixlets.csv` inside `dir` and return its path.
pub fn write_dataset(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("fixlets.csv");
    fs::write(&path, contents).expect("write dataset");
    path
}

pub fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fixlet_manager"))
}

/// Run the binary with `args`, feeding `stdin` and capturing everything.
pub fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = binary()
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn fixlet_manager");

    {
        let mut pipe = child.stdin.take().expect("stdin");
        pipe.write_all(stdin.as_bytes()).expect("write stdin");
    }

    child.wait_with_output().expect("wait")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
