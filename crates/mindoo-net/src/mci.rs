//! Header of the binary prefix files written by the unfolder.
//!
//! Only the two leading integers are read here; the body belongs to the
//! unfolder and the fact translator.

use std::io::Read;
use std::path::Path;

use crate::errors::MciError;

/// Leading counts of a complete-prefix file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixHeader {
    pub conditions: i32,
    /// Number of events, cut-offs included.
    pub events: i32,
}

impl PrefixHeader {
    pub fn read(path: &Path) -> Result<Self, MciError> {
        let io_err = |source| MciError::Io {
            path: path.display().to_string(),
            source,
        };
        let file = std::fs::File::open(path).map_err(io_err)?;
        let mut buf = Vec::with_capacity(8);
        file.take(8).read_to_end(&mut buf).map_err(io_err)?;
        Self::from_bytes(&buf).ok_or_else(|| MciError::Truncated {
            path: path.display().to_string(),
            len: buf.len(),
        })
    }

    /// Decode the header from the first eight bytes (native endianness, as
    /// the unfolder writes raw `int`s).
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let conditions = i32::from_ne_bytes(bytes.get(0..4)?.try_into().ok()?);
        let events = i32::from_ne_bytes(bytes.get(4..8)?.try_into().ok()?);
        Some(Self { conditions, events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_event_count_from_second_integer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.mci");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7i32.to_ne_bytes());
        bytes.extend_from_slice(&5i32.to_ne_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        std::fs::write(&path, bytes).unwrap();
        let header = PrefixHeader::read(&path).unwrap();
        assert_eq!(header.conditions, 7);
        assert_eq!(header.events, 5);
    }

    #[test]
    fn short_file_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.mci");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        assert!(matches!(
            PrefixHeader::read(&path),
            Err(MciError::Truncated { len: 3, .. })
        ));
    }
}
