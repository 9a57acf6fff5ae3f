//! Common error types.

use thiserror::Error;

/// Error type shared by the canvas, compositor and viewer crates.
#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown drawable: {0}")]
    UnknownDrawable(String),

    #[error("Cyclic ancestry: {0}")]
    CyclicAncestry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DrawResult<T> = Result<T, DrawError>;

impl DrawError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn unknown_drawable(msg: impl Into<String>) -> Self {
        Self::UnknownDrawable(msg.into())
    }

    pub fn cyclic(msg: impl Into<String>) -> Self {
        Self::CyclicAncestry(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DrawError::parse("bad tag 'sideways'");
        assert_eq!(err.to_string(), "Parse error: bad tag 'sideways'");

        let err = DrawError::cyclic("node 3 is its own ancestor");
        assert!(matches!(err, DrawError::CyclicAncestry(_)));
    }

    #[test]
    fn test_io_conversion() {
        fn open() -> DrawResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))?;
            Ok(())
        }

        assert!(matches!(open(), Err(DrawError::Io(_))));
    }
}
