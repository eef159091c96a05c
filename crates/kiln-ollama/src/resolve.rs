use crate::types::ModelCatalogEntry;

/// Model name that requests automatic selection
///
/// Shares its spelling with the provider itself, so a caller who meant a
/// model literally called `ollama` gets auto-selection instead.
pub const AUTO_MODEL: &str = "ollama";

/// Whether `requested` asks for automatic model selection
///
/// Only the exact empty string and the exact sentinel qualify. Whitespace
/// or case variants are taken as literal model names.
pub fn is_auto(requested: &str) -> bool {
    requested.is_empty() || requested == AUTO_MODEL
}

/// Pick the most recently modified entry
///
/// Ties keep the earliest entry in catalog order, and an entry without a
/// timestamp loses to any entry that has one. Returns `None` for an empty
/// catalog.
pub fn select_latest(models: &[ModelCatalogEntry]) -> Option<&ModelCatalogEntry> {
    let (first, rest) = models.split_first()?;
    Some(rest.iter().fold(first, |best, candidate| {
        if candidate.modified_at > best.modified_at {
            candidate
        } else {
            best
        }
    }))
}
