//! Line-level rendering for response blocks.

use crate::search::Match;
use std::fmt::{self, Write};

/// Attribution shown after the command on every result block.
pub(crate) const ATTRIBUTION: &str =
    "/ Data courtesy of **BomberBoi** and __nomansskyresources.com__ /";

/// Write the header line naming the equivalent command and its argument.
pub(crate) fn write_header<W: Write>(w: &mut W, command_text: &str) -> fmt::Result {
    writeln!(w, "__Command__: **{}**   {}", command_text, ATTRIBUTION)
}

/// Write one match as the four-line entry template.
pub(crate) fn write_entry<W: Write>(w: &mut W, found: &Match) -> fmt::Result {
    writeln!(w, "**{}: {}**", found.source, found.key)?;
    writeln!(w, "- Nutrient: {}", found.nutrient)?;
    writeln!(w, "- Duration: {}", found.duration)?;
    writeln!(w, "- Effect: {}", found.effect)
}

/// Write the truncation summary, including its leading blank line.
pub(crate) fn write_summary<W: Write>(w: &mut W, shown: usize, total: usize) -> fmt::Result {
    write!(w, "\n{} out of {} items shown", shown, total)
}

/// Length in characters, which is what the chat platform limits.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
