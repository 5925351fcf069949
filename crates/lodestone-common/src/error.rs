use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum LodestoneError {
    IoError(std::io::Error),
    /// The byte stream violates the tag-tree grammar. Fatal; no partial
    /// result is returned.
    MalformedStream(String),
    /// The running decoded-size accumulator went past the configured budget.
    SizeLimitExceeded { read: u64, max: u64 },
    /// Containers nested deeper than the decoder allows.
    DepthExceeded(usize),
    /// A structure document is missing a required key or references a
    /// palette entry that does not exist. The raw tag tree stays valid.
    StructuralError(String),
    /// Rotation was requested for an angle that is not a multiple of 90.
    UnsupportedRotation(i32),
}

impl fmt::Display for LodestoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LodestoneError::IoError(err) => write!(f, "IO error: {}", err),
            LodestoneError::MalformedStream(msg) => write!(f, "Malformed NBT stream: {}", msg),
            LodestoneError::SizeLimitExceeded { read, max } => write!(
                f,
                "Tried to read NBT tag that was too big; tried to allocate: {} bytes where max allowed: {}",
                read, max
            ),
            LodestoneError::DepthExceeded(depth) => write!(
                f,
                "Tried to read NBT tag with too high complexity, depth > {}",
                depth
            ),
            LodestoneError::StructuralError(msg) => write!(f, "Structure decode error: {}", msg),
            LodestoneError::UnsupportedRotation(angle) => write!(
                f,
                "Rotation angle {} is not a multiple of 90 degrees",
                angle
            ),
        }
    }
}

impl Error for LodestoneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LodestoneError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LodestoneError {
    fn from(err: std::io::Error) -> Self {
        LodestoneError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = LodestoneError::SizeLimitExceeded { read: 144, max: 128 };
        assert_eq!(
            format!("{}", err),
            "Tried to read NBT tag that was too big; tried to allocate: 144 bytes where max allowed: 128"
        );

        let err = LodestoneError::UnsupportedRotation(45);
        assert_eq!(
            format!("{}", err),
            "Rotation angle 45 is not a multiple of 90 degrees"
        );
    }

    #[test]
    fn test_io_error_source() {
        let err: LodestoneError =
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated").into();
        assert!(err.source().is_some());
        assert!(LodestoneError::DepthExceeded(512).source().is_none());
    }
}
