use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::FxResult;
use crate::model::{Fixlet, MalformedRowPolicy, OutputFormat};
use crate::records;

pub const DEFAULT_FILE: &str = "fixlets.csv";

#[derive(Debug, Parser)]
#[command(name = "fixlet_manager")]
#[command(about = "List, search, sort, add and delete fixlet records in a CSV file")]
pub struct Cli {
    /// CSV file holding the fixlet records.
    #[arg(long, global = true, default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// How to treat data rows that cannot be decoded.
    #[arg(long, global = true, value_enum, default_value_t = MalformedRowPolicy::Skip)]
    pub on_malformed: MalformedRowPolicy,

    /// Run one operation and exit. Without a subcommand an interactive
    /// menu is read from stdin.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every record.
    List(FormatArgs),
    /// Print the first record whose name or criticality contains TEXT.
    Query(QueryArgs),
    /// Print records ordered by relevant computer count.
    Sort(SortArgs),
    /// Append a record and save the file.
    Add(AddArgs),
    /// Remove the first record with the given fixlet id and save the file.
    Delete(DeleteArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FormatArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Case-insensitive substring to look for.
    pub text: String,

    #[command(flatten)]
    pub output: FormatArgs,
}

#[derive(Debug, Clone, Args)]
pub struct SortArgs {
    /// Save the sorted order back to the file.
    #[arg(long)]
    pub write: bool,

    #[command(flatten)]
    pub output: FormatArgs,
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub site_id: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub fixlet_id: i64,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub criticality: String,

    /// Number of computers the fixlet is relevant to.
    #[arg(long)]
    pub computers: u64,
}

impl AddArgs {
    #[must_use]
    pub fn to_fixlet(&self) -> Fixlet {
        Fixlet::new(
            self.site_id,
            self.fixlet_id,
            self.name.clone(),
            self.criticality.clone(),
            self.computers,
        )
    }
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    #[arg(allow_negative_numbers = true)]
    pub fixlet_id: i64,
}

/// Write `fixlets` to `out` in the requested format.
pub fn emit_fixlets<W: Write>(
    out: &mut W,
    fixlets: &[Fixlet],
    format: OutputFormat,
) -> FxResult<()> {
    match format {
        OutputFormat::Plain => records::list(fixlets, out)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(fixlets)?)?,
        OutputFormat::Ndjson => {
            for fixlet in fixlets {
                writeln!(out, "{}", serde_json::to_string(fixlet)?)?;
            }
        }
    }
    Ok(())
}

/// Write a single fixlet; JSON output is an object rather than an array.
pub fn emit_fixlet<W: Write>(out: &mut W, fixlet: &Fixlet, format: OutputFormat) -> FxResult<()> {
    match format {
        OutputFormat::Plain => writeln!(out, "{fixlet}")?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(fixlet)?)?,
        OutputFormat::Ndjson => writeln!(out, "{}", serde_json::to_string(fixlet)?)?,
    }
    Ok(())
}
