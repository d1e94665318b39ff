//! Pulls learning objectives out of a plain-text export of a published
//! scheme of work.
//!
//! Objective blocks start after a line containing `, students should:`
//! and run until the `TEACHING POINTS` heading. Ready for pasting into
//! `Objectives.csv`.

use std::io::{BufRead, Write};

const TRIGGER: &str = ", students should:";
const TERMINATOR: &str = "TEACHING POINTS";

/// Copies objective lines from `reader` to `writer`, one per line,
/// with trailing `;` or `.` stripped. Returns how many lines were
/// written, blank separators excluded.
pub fn extract_objectives<R, W>(reader: R, writer: &mut W) -> anyhow::Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut in_block = false;
    let mut count = 0;

    for line in reader.lines() {
        let line = line?;
        if !in_block {
            if line.contains(TRIGGER) {
                in_block = true;
            }
            continue;
        }
        if line.contains(TERMINATOR) {
            in_block = false;
            writeln!(writer)?;
            continue;
        }

        let mut objective = line.trim();
        if objective.ends_with(';') || objective.ends_with('.') {
            objective = &objective[..objective.len() - 1];
        }
        writeln!(writer, "{}", objective.trim())?;
        count += 1;
    }

    Ok(count)
}
