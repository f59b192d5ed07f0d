use std::io::{BufRead, Write};
use std::path::PathBuf;

use csv::{ReaderBuilder, Trim};

use crate::error::{FxError, FxResult};
use crate::model::{FIELD_COUNT, Fixlet};
use crate::{records, storage};

pub const MENU_PROMPT: &str = "Choose an operation: list, query, add, delete, sort, exit";
pub const QUERY_PROMPT: &str = "Enter name or criticality to query:";
pub const ADD_PROMPT: &str = "Enter SiteID, FxiletID, Name, Criticality, RelevantComputerCount:";
pub const DELETE_PROMPT: &str = "Enter FxiletID to delete:";

/// Interactive menu over an owned fixlet sequence.
///
/// Every successful `add` or `delete` rewrites the backing file. A failed
/// write is reported and the session carries on with the in-memory state.
pub struct Shell<R, W> {
    path: PathBuf,
    fixlets: Vec<Fixlet>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(path: PathBuf, fixlets: Vec<Fixlet>, input: R, output: W) -> Self {
        Self {
            path,
            fixlets,
            input,
            output,
        }
    }

    #[must_use]
    pub fn fixlets(&self) -> &[Fixlet] {
        &self.fixlets
    }

    pub fn into_fixlets(self) -> Vec<Fixlet> {
        self.fixlets
    }

    /// Run until `exit` or end of input.
    pub fn run(&mut self) -> FxResult<()> {
        loop {
            writeln!(self.output, "\n{MENU_PROMPT}")?;
            let Some(command) = self.read_line()? else {
                break;
            };
            tracing::debug!(command = %command, "shell command");

            match command.as_str() {
                "" => {}
                "list" => records::list(&self.fixlets, &mut self.output)?,
                "query" => {
                    writeln!(self.output, "{QUERY_PROMPT}")?;
                    let Some(query) = self.read_line()? else {
                        break;
                    };
                    records::search(&self.fixlets, &query, &mut self.output)?;
                }
                "sort" => {
                    records::sort_by_computer_count(&mut self.fixlets);
                    records::list(&self.fixlets, &mut self.output)?;
                }
                "add" => {
                    writeln!(self.output, "{ADD_PROMPT}")?;
                    let Some(line) = self.read_line()? else {
                        break;
                    };
                    self.add(&line)?;
                }
                "delete" => {
                    writeln!(self.output, "{DELETE_PROMPT}")?;
                    let Some(line) = self.read_line()? else {
                        break;
                    };
                    self.delete(&line)?;
                }
                "exit" => break,
                _ => writeln!(self.output, "Invalid command.")?,
            }
        }
        writeln!(self.output, "Exiting program.")?;
        self.output.flush()?;
        Ok(())
    }

    fn add(&mut self, line: &str) -> FxResult<()> {
        match parse_entry_line(line) {
            Ok(fixlet) => {
                tracing::info!(fixlet_id = fixlet.fixlet_id, "adding fixlet");
                records::append(&mut self.fixlets, fixlet);
                if self.persist()? {
                    writeln!(self.output, "Entry added.")?;
                }
            }
            Err(error) => writeln!(self.output, "Error adding entry: {error}")?,
        }
        Ok(())
    }

    fn delete(&mut self, line: &str) -> FxResult<()> {
        let Ok(fixlet_id) = line.parse::<i64>() else {
            writeln!(self.output, "Invalid FxiletID: {line}")?;
            return Ok(());
        };
        if records::remove_by_key(&mut self.fixlets, fixlet_id) {
            tracing::info!(fixlet_id, "deleted fixlet");
            if self.persist()? {
                writeln!(self.output, "Entry deleted.")?;
            }
        } else {
            writeln!(self.output, "Entry not found.")?;
        }
        Ok(())
    }

    /// Save the current sequence. Only failures writing to the terminal are
    /// propagated; a failed file write is printed and yields `false`.
    fn persist(&mut self) -> FxResult<bool> {
        match storage::save(&self.path, &self.fixlets) {
            Ok(()) => Ok(true),
            Err(error) => {
                tracing::error!(path = %self.path.display(), %error, "save failed");
                writeln!(self.output, "Error writing CSV file: {error}")?;
                Ok(false)
            }
        }
    }

    fn read_line(&mut self) -> FxResult<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }
}

/// Parse a user-typed record.
///
/// Accepts five comma-separated fields (CSV quoting allowed) or, when the
/// line has no comma, five whitespace-separated tokens.
pub fn parse_entry_line(line: &str) -> FxResult<Fixlet> {
    let fields: Vec<String> = if line.contains(',') {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(line.as_bytes());
        match reader.records().next() {
            Some(record) => record?.iter().map(str::to_owned).collect(),
            None => Vec::new(),
        }
    } else {
        line.split_whitespace().map(str::to_owned).collect()
    };

    if fields.len() != FIELD_COUNT {
        return Err(FxError::InvalidInput(format!(
            "expected {FIELD_COUNT} fields, got {}",
            fields.len()
        )));
    }

    Ok(Fixlet {
        site_id: strict_int(&fields[0], "SiteID")?,
        fixlet_id: strict_int(&fields[1], "FxiletID")?,
        name: fields[2].clone(),
        criticality: fields[3].clone(),
        relevant_computer_count: strict_int(&fields[4], "RelevantComputerCount")?,
    })
}

fn strict_int<T: std::str::FromStr>(raw: &str, column: &str) -> FxResult<T> {
    raw.parse()
        .map_err(|_| FxError::InvalidInput(format!("{column} must be an integer, got `{raw}`")))
}
