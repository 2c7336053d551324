//! Error types for compacta containers.

use thiserror::Error;

/// Result type alias using [`CompactaError`].
pub type Result<T> = std::result::Result<T, CompactaError>;

/// Every failure the codec can report.
///
/// Internal stages return these directly; the public entry points never
/// translate them further, so callers match on the variant (or on
/// [`CompactaError::kind`]) to learn which stage failed.
#[derive(Error, Debug)]
pub enum CompactaError {
    /// The underlying stream failed to read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A symbol had no code, or the input could not be rendered.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The bit sequence does not resolve against the code table.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Tree construction invariant violated.
    #[error("tree error: {0}")]
    Tree(String),

    /// Container bytes, code table or canonical text are malformed.
    #[error("format error: {0}")]
    Format(String),
}

impl CompactaError {
    pub fn encoding(msg: impl Into<String>) -> Self {
        CompactaError::Encoding(msg.into())
    }

    pub fn decoding(msg: impl Into<String>) -> Self {
        CompactaError::Decoding(msg.into())
    }

    pub fn tree(msg: impl Into<String>) -> Self {
        CompactaError::Tree(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        CompactaError::Format(msg.into())
    }

    /// Coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompactaError::Io(_) => ErrorKind::File,
            CompactaError::Encoding(_) => ErrorKind::Encoding,
            CompactaError::Decoding(_) => ErrorKind::Decoding,
            CompactaError::Tree(_) => ErrorKind::Tree,
            CompactaError::Format(_) => ErrorKind::Format,
        }
    }
}

/// Error category, one per [`CompactaError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    File,
    Encoding,
    Decoding,
    Tree,
    Format,
}

/// Numeric status codes handed to callers that want a flat code instead of
/// a typed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReturnCode {
    Success = 0,
    FileError = 1,
    EncodingError = 2,
    DecodingError = 3,
    TreeError = 4,
    FormatError = 5,
}

impl ReturnCode {
    /// Status code for the outcome of any codec operation.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ReturnCode::Success,
            Err(e) => e.kind().into(),
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ErrorKind> for ReturnCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::File => ReturnCode::FileError,
            ErrorKind::Encoding => ReturnCode::EncodingError,
            ErrorKind::Decoding => ReturnCode::DecodingError,
            ErrorKind::Tree => ReturnCode::TreeError,
            ErrorKind::Format => ReturnCode::FormatError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_codes_match_error_kinds() {
        let ok: Result<()> = Ok(());
        assert_eq!(ReturnCode::of(&ok).code(), 0);

        let cases = [
            (CompactaError::Io(std::io::Error::other("disk")), 1),
            (CompactaError::encoding("x"), 2),
            (CompactaError::decoding("x"), 3),
            (CompactaError::tree("x"), 4),
            (CompactaError::format("x"), 5),
        ];
        for (err, code) in cases {
            let result: Result<()> = Err(err);
            assert_eq!(ReturnCode::of(&result).code(), code);
        }
    }

    #[test]
    fn display_names_the_stage() {
        let err = CompactaError::format("bad magic");
        assert_eq!(err.to_string(), "format error: bad magic");
    }
}
