#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("unknown wizard step: {0}")]
    UnknownStep(String),

    #[error("corrupted wizard snapshot: {0}")]
    CorruptedSnapshot(String),
}
