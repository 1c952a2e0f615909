//! Utility functions for working with source positions

use crate::types::{Location, Range};

/// Convert a byte offset to a Location with line and column info
///
/// Returns None if the offset is out of bounds.
pub fn offset_to_location(source: &str, offset: usize) -> Option<Location> {
    if offset > source.len() {
        return None;
    }

    let mut row = 0;
    let mut column = 0;

    for (index, ch) in source.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            row += 1;
            column = 0;
        } else {
            column += 1;
        }
    }

    Some(Location {
        offset,
        row,
        column,
    })
}

/// Create a Range from start and end byte offsets, leaving rows and
/// columns at zero.
pub fn range_from_offsets(start: usize, end: usize) -> Range {
    Range {
        start: Location {
            offset: start,
            row: 0,
            column: 0,
        },
        end: Location {
            offset: end,
            row: 0,
            column: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_location() {
        let source = "ab\ncd\né";
        assert_eq!(offset_to_location(source, 0).unwrap().row, 0);

        let loc = offset_to_location(source, 4).unwrap();
        assert_eq!((loc.row, loc.column), (1, 1));

        let end = offset_to_location(source, source.len()).unwrap();
        assert_eq!((end.row, end.column), (2, 1));

        assert!(offset_to_location(source, source.len() + 1).is_none());
    }
}
