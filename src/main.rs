use std::io::{self, Write};

use clap::Parser;
use fixlet_manager::cli::{Cli, Command, emit_fixlet, emit_fixlets};
use fixlet_manager::shell::Shell;
use fixlet_manager::{FxError, FxResult, records, storage};

fn main() {
    let cli = Cli::parse();
    fixlet_manager::logging::init(cli.command.is_none());

    if let Err(error) = run(cli) {
        tracing::debug!(code = error.error_code(), "exiting with error");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> FxResult<()> {
    let report = storage::load(&cli.file, cli.on_malformed)?;
    if !report.rejected.is_empty() {
        tracing::info!(
            path = %cli.file.display(),
            rejected = report.rejected.len(),
            truncated = report.truncated,
            "some rows were not loaded"
        );
    }
    let mut fixlets = report.fixlets;
    let mut out = io::stdout().lock();

    match cli.command {
        None => Shell::new(cli.file, fixlets, io::stdin().lock(), out).run(),
        Some(Command::List(args)) => emit_fixlets(&mut out, &fixlets, args.format),
        Some(Command::Query(args)) => match records::find_first_match(&fixlets, &args.text) {
            Some(fixlet) => emit_fixlet(&mut out, fixlet, args.output.format),
            None => Err(FxError::NotFound(format!(
                "no fixlet matches `{}`",
                args.text
            ))),
        },
        Some(Command::Sort(args)) => {
            records::sort_by_computer_count(&mut fixlets);
            if args.write {
                storage::save(&cli.file, &fixlets)?;
            }
            emit_fixlets(&mut out, &fixlets, args.output.format)
        }
        Some(Command::Add(args)) => {
            records::append(&mut fixlets, args.to_fixlet());
            storage::save(&cli.file, &fixlets)?;
            writeln!(out, "Entry added.")?;
            Ok(())
        }
        Some(Command::Delete(args)) => {
            if !records::remove_by_key(&mut fixlets, args.fixlet_id) {
                return Err(FxError::NotFound(format!(
                    "no fixlet with FxiletID {}",
                    args.fixlet_id
                )));
            }
            storage::save(&cli.file, &fixlets)?;
            writeln!(out, "Entry deleted.")?;
            Ok(())
        }
    }
}
