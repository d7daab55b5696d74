use crate::error::{ImperiumError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Legal documents the drafting agent can produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DocumentType {
    #[serde(rename = "NDA")]
    Nda,
    #[serde(rename = "LPA")]
    Lpa,
    #[serde(rename = "Side Letter")]
    SideLetter,
    #[serde(rename = "Board Resolution")]
    BoardResolution,
}

impl DocumentType {
    /// Selection order offered to the user.
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Nda,
        DocumentType::Lpa,
        DocumentType::SideLetter,
        DocumentType::BoardResolution,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Nda => "NDA",
            DocumentType::Lpa => "LPA",
            DocumentType::SideLetter => "Side Letter",
            DocumentType::BoardResolution => "Board Resolution",
        }
    }

    /// Resolves a menu answer: a 1-based position in [`ALL`](Self::ALL) or a
    /// label. `None` when it matches neither.
    pub fn from_choice(choice: &str) -> Option<Self> {
        let choice = choice.trim();
        match choice.parse::<usize>() {
            Ok(n) => n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied()),
            Err(_) => choice.parse().ok(),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = ImperiumError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        DocumentType::ALL
            .iter()
            .copied()
            .find(|doc| doc.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ImperiumError::UnknownDocumentType(wanted.to_string()))
    }
}
