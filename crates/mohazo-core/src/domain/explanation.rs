//! Explanation scripts generated for a meeting note.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{MeetingNoteId, ScriptId};

/// Structured text blocks of an explanation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationContent {
    pub purpose: String,
    pub scope: String,
    pub decisions: String,
    pub next_actions: String,
}

impl ExplanationContent {
    /// Splits a description script into blocks.
    ///
    /// Lines of the form `Purpose:` / `Scope:` / `Decisions:` / `Next actions:`
    /// (case-insensitive) start a block. Text before the first heading, or a
    /// script with no headings at all, goes to `purpose`.
    pub fn from_script(script: &str) -> Self {
        let mut content = ExplanationContent::default();
        let mut current = Block::Purpose;
        for line in script.lines() {
            let (block, rest) = match Block::heading(line) {
                Some((block, rest)) => (block, rest),
                None => (current, line),
            };
            current = block;
            let target = content.block_mut(block);
            if rest.trim().is_empty() && target.is_empty() {
                continue;
            }
            if !target.is_empty() {
                target.push('\n');
            }
            target.push_str(rest.trim_end());
        }
        content
    }

    fn block_mut(&mut self, block: Block) -> &mut String {
        match block {
            Block::Purpose => &mut self.purpose,
            Block::Scope => &mut self.scope,
            Block::Decisions => &mut self.decisions,
            Block::NextActions => &mut self.next_actions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Purpose,
    Scope,
    Decisions,
    NextActions,
}

impl Block {
    const HEADINGS: [(&'static str, Block); 4] = [
        ("purpose:", Block::Purpose),
        ("scope:", Block::Scope),
        ("decisions:", Block::Decisions),
        ("next actions:", Block::NextActions),
    ];

    fn heading(line: &str) -> Option<(Block, &str)> {
        let trimmed = line.trim_start();
        Self::HEADINGS.iter().find_map(|(heading, block)| {
            let head = trimmed.get(..heading.len())?;
            head.eq_ignore_ascii_case(heading)
                .then(|| (*block, trimmed[heading.len()..].trim_start()))
        })
    }
}

/// One version of the explanation for a meeting note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationScript {
    pub id: ScriptId,
    pub meeting_note_id: MeetingNoteId,
    pub version: u32,
    pub content: ExplanationContent,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}
