/// Broad failure classes a caller can react to without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Truncated buffer or a block that does not fit its container.
    Framing,
    /// A record names a player or island that was never decoded.
    UnresolvedReference,
    /// A reserved field or enum-like value outside the known format.
    UnexpectedValue,
    /// A terrain file, block or configuration entry is missing.
    MissingExternalResource,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of data at offset {offset}: need {need} bytes, have {have}")]
    UnexpectedEof { offset: usize, need: usize, have: usize },

    #[error("seek to {pos} outside buffer of {len} bytes")]
    SeekOutOfBounds { pos: usize, len: usize },

    #[error("block {tag} declares {declared} bytes, only {remaining} remain")]
    BlockOverrun { tag: String, declared: usize, remaining: usize },

    #[error("INSELHAUS block appears before any island block")]
    OrphanOverlay,

    #[error("block {tag} has {len} bytes, not a multiple of the {record}-byte record")]
    MisalignedBlock { tag: String, len: usize, record: usize },

    #[error("unresolved {kind} reference: id {id}")]
    UnresolvedReference { kind: &'static str, id: u32 },

    #[error("unexpected value for {field}: {value:#x}")]
    UnexpectedValue { field: &'static str, value: u64 },

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("missing resource: {path}")]
    MissingResource { path: String },

    #[error("no island size category fits width {width}")]
    NoSizeCategory { width: u32 },

    #[error("no field definition for building id {id}")]
    UnknownFieldType { id: u32 },

    #[error("missing required block: {tag}")]
    MissingBlock { tag: &'static str },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

impl Error {
    pub fn unexpected(field: &'static str, value: impl Into<u64>) -> Self {
        Self::UnexpectedValue { field, value: value.into() }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedEof { .. }
            | Self::SeekOutOfBounds { .. }
            | Self::BlockOverrun { .. }
            | Self::OrphanOverlay
            | Self::MisalignedBlock { .. } => ErrorCategory::Framing,
            Self::UnresolvedReference { .. } => ErrorCategory::UnresolvedReference,
            Self::UnexpectedValue { .. } | Self::DuplicateId { .. } => ErrorCategory::UnexpectedValue,
            Self::MissingResource { .. }
            | Self::NoSizeCategory { .. }
            | Self::UnknownFieldType { .. }
            | Self::MissingBlock { .. }
            | Self::Config(_) => ErrorCategory::MissingExternalResource,
            Self::Io(_) => ErrorCategory::Io,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
