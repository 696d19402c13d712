//! Time-stamped Annotations List (TAL) decoding.
//!
//! Each data record's annotation-channel bytes form one TAL buffer: text
//! structured by three control bytes. `0x14` separates fields, `0x15` marks
//! an optional duration, and `0x00` terminates an annotation and pads the
//! channel out to its fixed per-record width. A buffer is a sequence of
//! onset blocks, each
//!
//! ```text
//! onset [ 0x15 duration ] 0x14 ( note 0x14 )*
//! ```
//!
//! separated by the two-byte marker `0x14 0x00`. Onset and duration are
//! decimal seconds; they are stored as milliseconds. A block with notes
//! yields one annotation per non-empty note; a block without any yields a
//! single note-less annotation, the record's time-keeping marker.

use crate::types::Annotation;
use crate::utils::parse_float;

const FIELD_SEPARATOR: u8 = 0x14;
const DURATION_MARKER: u8 = 0x15;
const TERMINATOR: u8 = 0x00;

/// Decodes one record's TAL buffer into its annotations, in order.
///
/// A buffer of pure padding (no separator byte at all) yields none. The
/// result is fully materialized so callers can inspect the whole per-record
/// group before deciding what to keep.
pub fn decode(buffer: &[u8]) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    while offset + 1 < buffer.len() {
        if buffer[offset] == FIELD_SEPARATOR && buffer[offset + 1] == TERMINATOR {
            if start < offset {
                decode_block(&buffer[start..offset], &mut annotations);
            }
            offset += 2;
            while offset < buffer.len() && buffer[offset] == TERMINATOR {
                offset += 1;
            }
            start = offset;
        } else {
            offset += 1;
        }
    }
    annotations
}

fn decode_block(block: &[u8], out: &mut Vec<Annotation>) {
    let mut chunks: Vec<&[u8]> = Vec::new();
    let mut has_duration = false;
    let mut start = 0;
    for (offset, &byte) in block.iter().enumerate() {
        if byte == FIELD_SEPARATOR || byte == DURATION_MARKER {
            if byte == DURATION_MARKER {
                has_duration = true;
            }
            if start < offset {
                chunks.push(&block[start..offset]);
            }
            start = offset + 1;
        }
    }
    if start < block.len() {
        chunks.push(&block[start..]);
    }

    let onset = millis(chunks.first().copied());
    // The marker's presence, not its value, distinguishes "no duration"
    // from "duration = 0".
    let duration = has_duration.then(|| millis(chunks.get(1).copied()));
    let notes = chunks.get(if has_duration { 2 } else { 1 }..).unwrap_or(&[]);

    if notes.is_empty() {
        out.push(Annotation {
            onset,
            duration,
            note: None,
        });
    } else {
        for note in notes {
            out.push(Annotation {
                onset,
                duration,
                note: Some(String::from_utf8_lossy(note).into_owned()),
            });
        }
    }
}

fn millis(chunk: Option<&[u8]>) -> f64 {
    match chunk {
        Some(text) => parse_float(&String::from_utf8_lossy(text)) * 1000.0,
        None => f64::NAN,
    }
}
