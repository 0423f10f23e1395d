//! Response assembly under the character budget, plus the bot's fixed texts.

pub(crate) mod renderers;

use crate::search::Match;
use renderers::{char_len, write_entry, write_header, write_summary};

/// Result of rendering a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one entry was rendered.
    Found(RenderedBlock),
    /// Nothing was rendered; carries the query as the user typed it.
    NoMatch { query: String },
}

/// A rendered, budget-capped result block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub text: String,
    /// Entries that made it into `text`
    pub shown: usize,
    /// Matches found before truncation
    pub total: usize,
}

/// Render matches into a block of at most `budget` characters.
///
/// Entries are appended in order until the first one that would push the
/// block past the budget; that entry and everything after it are dropped,
/// even if a later entry would fit. When entries were dropped a summary line
/// is added, and if the summary itself would overflow, trailing entries are
/// withdrawn until it fits.
pub fn render_block(command_text: &str, query: &str, matches: &[Match], budget: usize) -> Outcome {
    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = write_header(&mut text, command_text);
    let mut length = char_len(&text);

    // Byte offset where each rendered entry starts, and its character length
    let mut entries: Vec<(usize, usize)> = Vec::new();
    let mut entry = String::new();
    for found in matches {
        entry.clear();
        let _ = write_entry(&mut entry, found);
        let entry_len = char_len(&entry);
        if length + entry_len > budget {
            break;
        }
        entries.push((text.len(), entry_len));
        text.push_str(&entry);
        length += entry_len;
    }

    let total = matches.len();
    if entries.len() < total {
        let mut summary = String::new();
        loop {
            summary.clear();
            let _ = write_summary(&mut summary, entries.len(), total);
            if length + char_len(&summary) <= budget {
                break;
            }
            let Some((start, entry_len)) = entries.pop() else {
                break;
            };
            text.truncate(start);
            length -= entry_len;
        }
        if !entries.is_empty() {
            text.push_str(&summary);
        }
    }

    if entries.is_empty() {
        return Outcome::NoMatch {
            query: query.to_string(),
        };
    }

    Outcome::Found(RenderedBlock {
        text,
        shown: entries.len(),
        total,
    })
}

/// Reply for a resolution that rendered nothing.
pub fn no_match_text(query: &str) -> String {
    format!(
        "No matches found for '{}'. Try adjusting your search term.",
        query
    )
}

/// Private rejection for commands used outside the allowed channel.
pub fn wrong_channel_text(allowed_channel: u64) -> String {
    format!(
        "Please use the <#{}> channel for this command.",
        allowed_channel
    )
}

pub const UNKNOWN_COMMAND_TEXT: &str =
    "Unknown command. Available commands are: buff, buffneg, buffa, buffhelp.";

/// Static help block for the help command.
pub fn help_text(allowed_channel: u64, budget: usize) -> String {
    format!(
        "**NMS Buff Bot Commands**\n\
         Here's how to use me to find nutrient and effect data from No Man's Sky:\n\n\
         **/buff <text>** - Search for nutrients or effects matching `<text>`. Results are sorted by effect value (highest to lowest). Supports partial matches (e.g., 'iron' for 'Iron Root').\n\
         **/buffneg <text>** - Same as /buff, but sorts by effect value from lowest to highest (good for finding negative effects).\n\
         **/buffa <text>** - Same as /buff, but sorts alphabetically by name and labels items as 'Nutrient' or 'Effect'.\n\
         **/buffhelp** - Shows this help message (private to you).\n\n\
         All commands show up to {budget} characters of results. If there's more, you'll see 'N out of M items shown'. Data courtesy of **BomberBoi**!\n\
         Note: Commands other than `/buffhelp` must be used in the <#{allowed_channel}> channel."
    )
}
