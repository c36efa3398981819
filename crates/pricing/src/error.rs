#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown modifier type: {0}")]
    UnknownModifierType(String),

    #[error("unknown modifier category: {0}")]
    UnknownCategory(String),

    #[error("unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("duplicate modifier id: {0}")]
    DuplicateModifier(String),
}
