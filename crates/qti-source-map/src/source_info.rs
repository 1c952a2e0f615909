//! Source information attached to parsed nodes

use crate::context::SourceContext;
use crate::types::{FileId, Range};
use crate::utils::{offset_to_location, range_from_offsets};
use serde::{Deserialize, Serialize};

/// Where a node came from: a file and a byte range inside it.
///
/// Parsers fill in offsets only; rows and columns are computed on demand by
/// [`SourceInfo::resolve`] since most locations are never displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file_id: FileId,
    pub range: Range,
}

impl SourceInfo {
    /// Create source info for a byte range in an original file.
    pub fn original(file_id: FileId, start: usize, end: usize) -> Self {
        SourceInfo {
            file_id,
            range: range_from_offsets(start, end),
        }
    }

    pub fn start_offset(&self) -> usize {
        self.range.start.offset
    }

    pub fn end_offset(&self) -> usize {
        self.range.end.offset
    }

    /// Fill in row/column information using the file content held by `ctx`.
    ///
    /// Returns `None` when the file is unknown or its content is unavailable.
    pub fn resolve(&self, ctx: &SourceContext) -> Option<SourceInfo> {
        let content = ctx.get_file(self.file_id)?.content.as_deref()?;
        let start = offset_to_location(content, self.start_offset())?;
        let end = offset_to_location(content, self.end_offset())?;
        Some(SourceInfo {
            file_id: self.file_id,
            range: Range { start, end },
        })
    }
}
