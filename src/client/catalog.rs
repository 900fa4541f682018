//! Dashboard view over the caller's games: title search and sorting.

use serde::{Deserialize, Serialize};

use crate::game::record::GameDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first.
    #[default]
    Date,
    /// Title, A to Z.
    Name,
    /// Most pieces first.
    Pieces,
}

/// Games whose title contains `search` (case-insensitive), sorted by `sort`.
pub fn browse<'a>(games: &'a [GameDocument], search: &str, sort: SortBy) -> Vec<&'a GameDocument> {
    let needle = search.to_lowercase();
    let mut found: Vec<&GameDocument> = games
        .iter()
        .filter(|g| g.title.to_lowercase().contains(&needle))
        .collect();

    match sort {
        SortBy::Date => found.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::Name => found.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
        }),
        SortBy::Pieces => found.sort_by(|a, b| b.pieces.len().cmp(&a.pieces.len())),
    }
    found
}
