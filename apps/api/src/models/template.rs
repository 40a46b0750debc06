use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selects one of the registered template variants.
///
/// Orthogonal to document content: changing it never touches the `ResumeDocument`.
/// Wire names match the editor UI (`single`, `double`, `colored`, `singleColored`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateId {
    /// Minimalist, single column.
    #[default]
    Single,
    /// Records in a main column, rich-text blocks in a side column.
    Double,
    /// Modern-Visual: accent bar header over a 1/3 + 2/3 grid.
    Colored,
    /// Single column under a coloured banner.
    SingleColored,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Single,
        TemplateId::Double,
        TemplateId::Colored,
        TemplateId::SingleColored,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Single => "single",
            TemplateId::Double => "double",
            TemplateId::Colored => "colored",
            TemplateId::SingleColored => "singleColored",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown template identifier: {0}")]
pub struct UnknownTemplate(pub String);

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}
