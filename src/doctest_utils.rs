//! Internal support for the crate's documentation examples.
//!
//! The examples need a small valid EDF+ buffer without shipping a binary
//! fixture, so this module builds one in memory: two data signals, an
//! annotation channel and a checksum channel, over two one-second records.

/// Pads an ASCII value out to its fixed column width.
fn field(value: &str, width: usize) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    assert!(bytes.len() <= width, "'{value}' wider than {width} bytes");
    bytes.resize(width, b' ');
    bytes
}

fn samples_le(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Pads a TAL chunk out to the annotation channel's per-record width.
fn tal_chunk(text: &[u8], width: usize) -> Vec<u8> {
    let mut bytes = text.to_vec();
    assert!(bytes.len() <= width);
    bytes.resize(width, 0x00);
    bytes
}

/// A two-record EDF+ sleep-study buffer.
///
/// Decodes to two signals ("EEG Fpz-Cz" with 8 samples, "Temp rectal" with
/// 4), two annotations (record 0's time-keeping marker and an "Apnea" note
/// at 1.5 s) and a start instant of 1987-09-16T20:35:00Z.
pub fn sleep_study_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend(field("0", 8));
    bytes.extend(field("MCH-0234567 F 16-SEP-1987 Haagse_Harry", 80));
    bytes.extend(field("Startdate 16-SEP-1987 PSG-1234/1987 NN Telemetry03", 80));
    bytes.extend(field("16.09.87", 8));
    bytes.extend(field("20.35.00", 8));
    bytes.extend(field("1280", 8));
    bytes.extend(field("EDF+C", 44));
    bytes.extend(field("2", 8));
    bytes.extend(field("1", 8));
    bytes.extend(field("4", 4));

    // Signal header: one block per field, each holding all four signals.
    for label in ["EEG Fpz-Cz", "Temp rectal", "EDF Annotations", "Crc16"] {
        bytes.extend(field(label, 16));
    }
    for transducer in ["AgAgCl cup electrodes", "Rectal thermistor", "", ""] {
        bytes.extend(field(transducer, 80));
    }
    for dimension in ["uV", "degC", "", ""] {
        bytes.extend(field(dimension, 8));
    }
    for minimum in ["-440", "34.4", "-1", "-1"] {
        bytes.extend(field(minimum, 8));
    }
    for maximum in ["510", "40.2", "1", "1"] {
        bytes.extend(field(maximum, 8));
    }
    for minimum in ["-2048", "-2048", "-32768", "-32768"] {
        bytes.extend(field(minimum, 8));
    }
    for maximum in ["2047", "2047", "32767", "32767"] {
        bytes.extend(field(maximum, 8));
    }
    for prefilter in ["HP:0.1Hz LP:75Hz N:50Hz", "LP:0.1Hz (first order)", "", ""] {
        bytes.extend(field(prefilter, 80));
    }
    for count in ["4", "2", "10", "1"] {
        bytes.extend(field(count, 8));
    }
    for _ in 0..4 {
        bytes.extend(field("", 32));
    }

    // Record 0.
    bytes.extend(samples_le(&[10, 20, 30, 40]));
    bytes.extend(samples_le(&[300, 301]));
    bytes.extend(tal_chunk(b"+0\x14\x14", 20));
    bytes.extend(samples_le(&[0x1234]));

    // Record 1.
    bytes.extend(samples_le(&[50, 60, 70, 80]));
    bytes.extend(samples_le(&[302, 303]));
    bytes.extend(tal_chunk(b"+1\x14\x14\x00+1.5\x14Apnea\x14", 20));
    bytes.extend(samples_le(&[0x2345]));

    bytes
}
