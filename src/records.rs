//! In-memory operations over a caller-owned sequence of fixlets.
//!
//! Nothing here touches the filesystem; callers decide when to persist with
//! [`crate::storage::save`].

use std::io::{self, Write};

use crate::model::Fixlet;

pub const EMPTY_LISTING: &str = "No entries available.";
pub const NO_MATCH: &str = "No entries found.";

/// Print one line per fixlet, or a placeholder line when there are none.
pub fn list<W: Write>(fixlets: &[Fixlet], out: &mut W) -> io::Result<()> {
    if fixlets.is_empty() {
        return writeln!(out, "{EMPTY_LISTING}");
    }
    for fixlet in fixlets {
        writeln!(out, "{fixlet}")?;
    }
    Ok(())
}

/// First fixlet whose name or criticality contains `query`, ignoring case.
#[must_use]
pub fn find_first_match<'a>(fixlets: &'a [Fixlet], query: &str) -> Option<&'a Fixlet> {
    let needle = query.to_lowercase();
    fixlets.iter().find(|fixlet| {
        fixlet.name.to_lowercase().contains(&needle)
            || fixlet.criticality.to_lowercase().contains(&needle)
    })
}

/// Print the first match for `query` only, even when several rows match.
pub fn search<W: Write>(fixlets: &[Fixlet], query: &str, out: &mut W) -> io::Result<bool> {
    match find_first_match(fixlets, query) {
        Some(fixlet) => {
            writeln!(out, "{fixlet}")?;
            Ok(true)
        }
        None => {
            writeln!(out, "{NO_MATCH}")?;
            Ok(false)
        }
    }
}

/// Ascending by affected computer count; equal counts keep their order.
pub fn sort_by_computer_count(fixlets: &mut [Fixlet]) {
    fixlets.sort_by_key(|fixlet| fixlet.relevant_computer_count);
}

pub fn append(fixlets: &mut Vec<Fixlet>, fixlet: Fixlet) {
    fixlets.push(fixlet);
}

/// Remove the first fixlet with `fixlet_id`. Returns whether one was removed.
pub fn remove_by_key(fixlets: &mut Vec<Fixlet>, fixlet_id: i64) -> bool {
    match fixlets.iter().position(|fixlet| fixlet.fixlet_id == fixlet_id) {
        Some(index) => {
            fixlets.remove(index);
            true
        }
        None => false,
    }
}
