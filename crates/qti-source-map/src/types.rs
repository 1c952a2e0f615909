//! Core location types

use serde::{Deserialize, Serialize};

/// A unique identifier for a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// A location in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

/// A range in source text from start (inclusive) to end (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Location,
    pub end: Location,
}

impl Range {
    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Whether the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let a = Location { offset: 0, row: 0, column: 0 };
        let b = Location { offset: 5, row: 0, column: 5 };
        let c = Location { offset: 10, row: 1, column: 0 };

        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_range_len() {
        let range = Range {
            start: Location { offset: 3, row: 0, column: 3 },
            end: Location { offset: 9, row: 0, column: 9 },
        };
        assert_eq!(range.len(), 6);
        assert!(!range.is_empty());
        assert!(Range::default().is_empty());
    }

    #[test]
    fn test_serialization_file_id() {
        let id = FileId(42);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: FileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
