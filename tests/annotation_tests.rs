use edfread::{decode, Annotation};
use pretty_assertions::assert_eq;

// Pads an ASCII value out to its fixed column width.
fn field(value: &str, width: usize) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    assert!(bytes.len() <= width, "'{value}' wider than {width} bytes");
    bytes.resize(width, b' ');
    bytes
}

fn samples_le(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn tal_chunk(text: &[u8], width: usize) -> Vec<u8> {
    let mut bytes = text.to_vec();
    assert!(bytes.len() <= width);
    bytes.resize(width, 0x00);
    bytes
}

// One EEG channel plus an annotation channel; each record's TAL text is
// given directly.
fn build_edf_with_tals(tals: &[&[u8]]) -> Vec<u8> {
    let tal_width = 32usize;
    let mut bytes = Vec::new();
    bytes.extend(field("0", 8));
    bytes.extend(field("PSG-77 F 02-MAY-2021 Night_Owl", 80));
    bytes.extend(field("Startdate 02-MAY-2021 PSG-77/2021 NN Telemetry03", 80));
    bytes.extend(field("02.05.21", 8));
    bytes.extend(field("23.05.00", 8));
    bytes.extend(field("768", 8));
    bytes.extend(field("EDF+C", 44));
    bytes.extend(field(&tals.len().to_string(), 8));
    bytes.extend(field("30", 8));
    bytes.extend(field("2", 4));
    for label in ["EEG Fpz-Cz", "EDF Annotations"] {
        bytes.extend(field(label, 16));
    }
    for _ in 0..2 {
        bytes.extend(field("AgAgCl cup electrodes", 80));
    }
    for _ in 0..2 {
        bytes.extend(field("uV", 8));
    }
    for _ in 0..2 {
        bytes.extend(field("-500", 8));
    }
    for _ in 0..2 {
        bytes.extend(field("500", 8));
    }
    for _ in 0..2 {
        bytes.extend(field("-2048", 8));
    }
    for _ in 0..2 {
        bytes.extend(field("2047", 8));
    }
    for _ in 0..2 {
        bytes.extend(field("", 80));
    }
    let annotation_samples = (tal_width / 2).to_string();
    for count in ["2", annotation_samples.as_str()] {
        bytes.extend(field(count, 8));
    }
    for _ in 0..2 {
        bytes.extend(field("", 32));
    }
    for (record, tal) in tals.iter().enumerate() {
        bytes.extend(samples_le(&[record as i16, record as i16 + 1]));
        bytes.extend(tal_chunk(tal, tal_width));
    }
    bytes
}

fn annotation(onset: f64, duration: Option<f64>, note: Option<&str>) -> Annotation {
    Annotation {
        onset,
        duration,
        note: note.map(str::to_string),
    }
}

#[test]
fn test_record_zero_time_keeping_marker_is_kept() {
    let tals: &[&[u8]] = &[b"+0\x14\x14"];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();
    assert_eq!(recording.annotations, vec![annotation(0.0, None, None)]);
}

#[test]
fn test_later_records_time_keeping_markers_are_dropped() {
    let tals: &[&[u8]] = &[
        b"+0\x14\x14",
        b"+30\x14\x14",
        b"+60\x14\x14\x00+61.5\x155\x14Arousal\x14",
    ];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();

    assert_eq!(
        recording.annotations,
        vec![
            annotation(0.0, None, None),
            annotation(61500.0, Some(5000.0), Some("Arousal")),
        ]
    );
}

#[test]
fn test_marker_with_note_survives_in_later_records() {
    let tals: &[&[u8]] = &[b"+0\x14\x14", b"+30\x14Lights off\x14"];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();

    assert_eq!(
        recording.annotations,
        vec![
            annotation(0.0, None, None),
            annotation(30000.0, None, Some("Lights off")),
        ]
    );
}

#[test]
fn test_zero_duration_is_not_a_bare_marker() {
    // Presence of the duration marker, not its value, is what counts.
    let tals: &[&[u8]] = &[b"+0\x14\x14", b"+30\x150\x14\x14"];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();

    assert_eq!(
        recording.annotations,
        vec![
            annotation(0.0, None, None),
            annotation(30000.0, Some(0.0), None),
        ]
    );
}

#[test]
fn test_one_annotation_per_note_through_full_decode() {
    let tals: &[&[u8]] = &[b"+12\x14Note 1\x14Note 2\x14Note 3\x14"];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();

    assert_eq!(
        recording.annotations,
        vec![
            annotation(12000.0, None, Some("Note 1")),
            annotation(12000.0, None, Some("Note 2")),
            annotation(12000.0, None, Some("Note 3")),
        ]
    );
}

#[test]
fn test_annotations_concatenate_in_record_order() {
    let tals: &[&[u8]] = &[
        b"+0\x14\x14\x00+5\x14Hypopnea\x14",
        b"+30\x14\x14\x00+42\x152\x14Desaturation\x14",
    ];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();

    assert_eq!(
        recording.annotations,
        vec![
            annotation(0.0, None, None),
            annotation(5000.0, None, Some("Hypopnea")),
            annotation(42000.0, Some(2000.0), Some("Desaturation")),
        ]
    );
    let onsets: Vec<f64> = recording.annotations.iter().map(|a| a.onset).collect();
    assert!(onsets.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_padding_only_record_yields_nothing() {
    let tals: &[&[u8]] = &[b"+0\x14\x14", b""];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();
    assert_eq!(recording.annotations, vec![annotation(0.0, None, None)]);
}

#[test]
fn test_annotation_channel_is_not_a_signal() {
    let tals: &[&[u8]] = &[b"+0\x14\x14"];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();
    let labels: Vec<&str> = recording.signals.iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["EEG Fpz-Cz"]);
}

#[test]
fn test_annotations_serialize_as_plain_records() {
    let tals: &[&[u8]] = &[
        b"+0\x14\x14",
        b"+30\x14\x14\x00+42\x152\x14Desaturation\x14",
    ];
    let recording = decode(&build_edf_with_tals(tals)).unwrap();

    let value = serde_json::to_value(&recording.annotations).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            { "onset": 0.0, "duration": null, "note": null },
            { "onset": 42000.0, "duration": 2000.0, "note": "Desaturation" },
        ])
    );

    let roundtrip: Vec<Annotation> = serde_json::from_value(value).unwrap();
    assert_eq!(roundtrip, recording.annotations);
}
