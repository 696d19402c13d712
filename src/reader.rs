//! Buffer decoding: the fixed global header, the field-major signal header,
//! record demultiplexing, and assembly of the final [`Recording`].

use crate::error::{EdfError, Result};
use crate::tal;
use crate::timestamp;
use crate::types::{Annotation, Header, Recording, Signal, SignalHeader};
use crate::utils::{float_field, int_field, string_field};
use crate::{HEADER_SIZE, SIGNAL_HEADER_SIZE};

/// Decodes a complete in-memory EDF/EDF+ buffer.
///
/// This is the whole pipeline: header, signal headers, data records, TAL
/// annotations, start instant. The annotation and checksum channels are
/// consumed here and never appear among the returned signals.
pub fn decode(bytes: &[u8]) -> Result<Recording> {
    let header = decode_header(bytes)?;
    let signal_headers = decode_signal_headers(bytes, &header)?;
    let demuxed = demux_records(bytes, &header, &signal_headers)?;
    Ok(assemble(&header, signal_headers, demuxed))
}

/// Decodes the fixed 256-byte global header.
///
/// Buffers shorter than 256 bytes fail hard. Numeric fields that do not
/// parse are carried as sentinels (`None` / NaN) instead of failing, since
/// real-world producers get these columns wrong without making the rest of
/// the file undecodable.
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() < HEADER_SIZE {
        return Err(EdfError::MalformedHeader {
            needed: HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    let header = Header {
        version: int_field(&bytes[0..8]),
        patient_id: string_field(&bytes[8..88]),
        recording_id: string_field(&bytes[88..168]),
        start_date: string_field(&bytes[168..176]),
        start_time: string_field(&bytes[176..184]),
        header_byte_size: int_field(&bytes[184..192]),
        reserved: string_field(&bytes[192..236]),
        record_count: int_field(&bytes[236..244]),
        record_duration: float_field(&bytes[244..252]),
        signal_count: int_field(&bytes[252..256]),
    };

    if header.header_byte_size.is_none() {
        log::warn!("header byte size field is not a valid number");
    }
    if header.record_count.is_none() {
        log::warn!("record count field is not a valid number");
    }
    if !header.record_duration.is_finite() {
        log::warn!("record duration field is not a valid number");
    }

    Ok(header)
}

/// Decodes the per-signal metadata block starting at byte 256.
///
/// The block is field-major: all N labels first, then all N transducer
/// types, and so on. For a field of per-entry width `w`, signal `n`'s value
/// starts at the field block's offset plus `n * w`, and the block spans
/// `w * signal_count` bytes. Signal-major arithmetic would silently corrupt
/// every signal past index 0.
pub fn decode_signal_headers(bytes: &[u8], header: &Header) -> Result<Vec<SignalHeader>> {
    let count = header
        .signal_count
        .ok_or(EdfError::InvalidNumericField("number of signals"))?;
    if count < 1 {
        return Err(EdfError::InvalidSignalCount(count));
    }
    let n = count as usize;

    let needed = HEADER_SIZE + n * SIGNAL_HEADER_SIZE;
    if bytes.len() < needed {
        return Err(EdfError::MalformedHeader {
            needed,
            actual: bytes.len(),
        });
    }
    let block = &bytes[HEADER_SIZE..needed];

    let mut signals = Vec::with_capacity(n);
    for i in 0..n {
        let label_start = i * 16;
        let transducer_start = n * 16 + i * 80;
        let dimension_start = n * 96 + i * 8;
        let physical_min_start = n * 104 + i * 8;
        let physical_max_start = n * 112 + i * 8;
        let digital_min_start = n * 120 + i * 8;
        let digital_max_start = n * 128 + i * 8;
        let prefilter_start = n * 136 + i * 80;
        let samples_start = n * 216 + i * 8;
        let reserved_start = n * 224 + i * 32;

        signals.push(SignalHeader {
            label: string_field(&block[label_start..label_start + 16]),
            transducer_type: string_field(&block[transducer_start..transducer_start + 80]),
            physical_dimension: string_field(&block[dimension_start..dimension_start + 8]),
            physical_minimum: float_field(&block[physical_min_start..physical_min_start + 8]),
            physical_maximum: float_field(&block[physical_max_start..physical_max_start + 8]),
            digital_minimum: int_field(&block[digital_min_start..digital_min_start + 8]),
            digital_maximum: int_field(&block[digital_max_start..digital_max_start + 8]),
            prefiltering: string_field(&block[prefilter_start..prefilter_start + 80]),
            samples_per_record: int_field(&block[samples_start..samples_start + 8]),
            reserved: string_field(&block[reserved_start..reserved_start + 32]),
        });
    }

    Ok(signals)
}

struct DemuxedRecords {
    record_count: usize,
    /// Raw samples per signal, in header order; reserved channels stay
    /// empty here.
    samples: Vec<Vec<i16>>,
    /// Annotation-channel bytes, grouped per record for TAL decoding.
    annotation_chunks: Vec<Vec<u8>>,
    /// Checksum-channel bytes per record: extracted verbatim, never
    /// verified, dropped during assembly.
    #[allow(dead_code)]
    checksum_chunks: Vec<Vec<u8>>,
}

/// Walks the interleaved data records starting at `header_byte_size`.
///
/// Within a record, channels appear in header order, each occupying
/// `samples_per_record * 2` bytes. Ordinary channels decode as signed
/// little-endian int16; the reserved channels keep their raw bytes. Bytes
/// past the last declared record are ignored.
fn demux_records(
    bytes: &[u8],
    header: &Header,
    signals: &[SignalHeader],
) -> Result<DemuxedRecords> {
    let data_start = header
        .header_byte_size
        .and_then(|size| usize::try_from(size).ok())
        .ok_or(EdfError::InvalidNumericField("header byte size"))?;
    if bytes.len() < data_start {
        return Err(EdfError::MalformedHeader {
            needed: data_start,
            actual: bytes.len(),
        });
    }

    let mut widths = Vec::with_capacity(signals.len());
    for signal in signals {
        let count = signal
            .samples_per_record
            .and_then(|count| usize::try_from(count).ok())
            .ok_or(EdfError::InvalidNumericField("samples per record"))?;
        widths.push(count * 2);
    }
    let record_size: usize = widths.iter().sum();

    let declared = header
        .record_count
        .ok_or(EdfError::InvalidNumericField("number of data records"))?;
    let record_count = if declared >= 0 {
        declared as usize
    } else if record_size > 0 {
        // A negative count is the format's "unknown" convention; fall back
        // to what the data section actually holds.
        (bytes.len() - data_start) / record_size
    } else {
        0
    };

    let needed = data_start + record_count * record_size;
    if bytes.len() < needed {
        return Err(EdfError::MalformedHeader {
            needed,
            actual: bytes.len(),
        });
    }

    let mut samples = vec![Vec::new(); signals.len()];
    for (i, signal) in signals.iter().enumerate() {
        if !signal.is_annotations() && !signal.is_checksum() {
            samples[i].reserve_exact(widths[i] / 2 * record_count);
        }
    }
    let mut annotation_chunks = vec![Vec::new(); record_count];
    let mut checksum_chunks = vec![Vec::new(); record_count];

    let mut offset = data_start;
    for record in 0..record_count {
        for (i, signal) in signals.iter().enumerate() {
            let chunk = &bytes[offset..offset + widths[i]];
            if signal.is_annotations() {
                annotation_chunks[record].extend_from_slice(chunk);
            } else if signal.is_checksum() {
                checksum_chunks[record].extend_from_slice(chunk);
            } else {
                samples[i].extend(
                    chunk
                        .chunks_exact(2)
                        .map(|pair| i16::from_le_bytes([pair[0], pair[1]])),
                );
            }
            offset += widths[i];
        }
    }

    Ok(DemuxedRecords {
        record_count,
        samples,
        annotation_chunks,
        checksum_chunks,
    })
}

fn assemble(
    header: &Header,
    signal_headers: Vec<SignalHeader>,
    demuxed: DemuxedRecords,
) -> Recording {
    let mut annotations = Vec::new();
    for (record, chunk) in demuxed.annotation_chunks.iter().enumerate() {
        let mut group = tal::decode(chunk);
        // Every record opens with a bare time-keeping marker; only record
        // 0's anchors the recording and is kept.
        if record > 0 && group.first().is_some_and(Annotation::is_time_keeping) {
            group.remove(0);
        }
        annotations.extend(group);
    }

    let signals: Vec<Signal> = signal_headers
        .into_iter()
        .zip(demuxed.samples)
        .filter(|(signal, _)| !signal.is_annotations() && !signal.is_checksum())
        .map(|(header, samples)| Signal { header, samples })
        .collect();

    log::debug!(
        "decoded {} signals over {} records with {} annotations",
        signals.len(),
        demuxed.record_count,
        annotations.len()
    );

    Recording {
        start_instant: timestamp::start_instant(header),
        duration_millis: header.record_duration * demuxed.record_count as f64 * 1000.0,
        signals,
        annotations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctest_utils::sleep_study_bytes;

    #[test]
    fn test_demux_keeps_checksum_bytes_verbatim() {
        let bytes = sleep_study_bytes();
        let header = decode_header(&bytes).unwrap();
        let signal_headers = decode_signal_headers(&bytes, &header).unwrap();
        let demuxed = demux_records(&bytes, &header, &signal_headers).unwrap();

        assert_eq!(demuxed.record_count, 2);
        assert_eq!(demuxed.checksum_chunks.len(), 2);
        assert_eq!(demuxed.checksum_chunks[0], 0x1234i16.to_le_bytes());
        assert_eq!(demuxed.checksum_chunks[1], 0x2345i16.to_le_bytes());
        // Reserved channels contribute no int16 samples.
        assert!(demuxed.samples[2].is_empty());
        assert!(demuxed.samples[3].is_empty());
    }

    #[test]
    fn test_demux_groups_annotation_bytes_per_record() {
        let bytes = sleep_study_bytes();
        let header = decode_header(&bytes).unwrap();
        let signal_headers = decode_signal_headers(&bytes, &header).unwrap();
        let demuxed = demux_records(&bytes, &header, &signal_headers).unwrap();

        assert_eq!(demuxed.annotation_chunks.len(), 2);
        assert!(demuxed.annotation_chunks[0].starts_with(b"+0\x14\x14"));
        assert!(demuxed.annotation_chunks[1].starts_with(b"+1\x14\x14"));
    }
}
