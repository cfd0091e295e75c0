use crate::view::ViewKind;

/// Errors that can occur while materialising a read view.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The derivation worker thread could not be started.
    #[error("failed to start {kind} derivation worker: {source}")]
    Spawn {
        kind: ViewKind,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StreamError>;
