//! Selection of the raw message octets that go into `messageContent`.

use memmap::Mmap;
use std::fs::File;
use std::io;
use std::ops::Range;

use crate::config::ContentInclusionMode;
use crate::error::Result;
use crate::store::IndexRecord;

/// `len` capped to `limit`, where a limit of 0 means no limit.
fn truncated(len: usize, limit: usize) -> usize {
    if limit > 0 && len > limit {
        limit
    } else {
        len
    }
}

/// The octets of the message to include under `mode` with truncation size `limit`, or `None`
/// when nothing is to be included.
pub fn content_window(
    mode: ContentInclusionMode,
    limit: usize,
    record: &IndexRecord,
) -> Option<Range<usize>> {
    let header = record.header_size.min(record.size);
    let body = record.body_size();
    let window = match mode {
        // larger messages are left out entirely; the URL is enough to fetch them
        ContentInclusionMode::Standard if limit > 0 && record.size > limit => return None,
        ContentInclusionMode::Standard => 0..record.size,
        ContentInclusionMode::Message => 0..truncated(record.size, limit),
        ContentInclusionMode::Header => 0..truncated(header, limit),
        ContentInclusionMode::Body => header..header + truncated(body, limit),
        ContentInclusionMode::HeaderBody => 0..header + truncated(body, limit),
    };
    Some(window)
}

/// Copy `window` out of the message file.
///
/// The file is mapped for the duration of the call only. Invalid UTF-8 is replaced.
pub fn read_window(file: &File, window: Range<usize>) -> Result<String> {
    if window.is_empty() {
        return Ok(String::new());
    }
    // Safety: the mapping is read-only and dropped before returning; the mail store does not
    // rewrite message files in place.
    let map = unsafe { Mmap::map(file)? };
    let bytes = map.get(window.clone()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "message file has {} octets, needed {}..{}",
                map.len(),
                window.start,
                window.end
            ),
        )
    })?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}
