use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{ANNOTATIONS_LABEL, CHECKSUM_LABEL};

/// The fixed 256-byte global header of an EDF/EDF+ file.
///
/// Numeric fields follow the permissive policy of the format's ecosystem:
/// an integer column that does not parse is `None`, a float column is NaN.
/// Text columns are stored with their space padding removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub version: Option<i64>,
    pub patient_id: String,
    pub recording_id: String,
    /// Recording start date, `dd.mm.yy`.
    pub start_date: String,
    /// Recording start time, `hh.mm.ss`.
    pub start_time: String,
    /// Total header size in bytes; data records begin at this offset.
    pub header_byte_size: Option<i64>,
    pub reserved: String,
    pub record_count: Option<i64>,
    /// Duration of one data record, in seconds.
    pub record_duration: f64,
    pub signal_count: Option<i64>,
}

impl Header {
    /// True when the reserved field carries the EDF+ continuity marker
    /// (`EDF+C` or `EDF+D`). Plain EDF files decode identically.
    pub fn is_edf_plus(&self) -> bool {
        self.reserved.starts_with("EDF+")
    }
}

/// Per-signal metadata from the field-major signal header block.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalHeader {
    pub label: String,
    pub transducer_type: String,
    pub physical_dimension: String,
    pub physical_minimum: f64,
    pub physical_maximum: f64,
    pub digital_minimum: Option<i64>,
    pub digital_maximum: Option<i64>,
    pub prefiltering: String,
    pub samples_per_record: Option<i64>,
    pub reserved: String,
}

impl SignalHeader {
    /// True for the EDF+ annotation channel. The label match is exact.
    pub fn is_annotations(&self) -> bool {
        self.label == ANNOTATIONS_LABEL
    }

    /// True for the embedded checksum channel. The label match is exact.
    pub fn is_checksum(&self) -> bool {
        self.label == CHECKSUM_LABEL
    }

    /// Physical units per digital step. NaN when a bound is unparsable.
    pub fn gain(&self) -> f64 {
        match (self.digital_minimum, self.digital_maximum) {
            (Some(dmin), Some(dmax)) => {
                (self.physical_maximum - self.physical_minimum) / (dmax - dmin) as f64
            }
            _ => f64::NAN,
        }
    }

    /// Physical value corresponding to digital zero.
    pub fn offset(&self) -> f64 {
        match self.digital_maximum {
            Some(dmax) => self.physical_maximum - self.gain() * dmax as f64,
            None => f64::NAN,
        }
    }

    /// Converts one stored sample to its calibrated physical value.
    ///
    /// Decoding never applies this itself; samples stay raw (see
    /// [`Signal::samples`]).
    pub fn to_physical(&self, digital: i16) -> f64 {
        self.gain() * digital as f64 + self.offset()
    }

    /// Sampling rate in Hz given the record duration from the header.
    pub fn sample_frequency(&self, record_duration_secs: f64) -> f64 {
        match self.samples_per_record {
            Some(count) => count as f64 / record_duration_secs,
            None => f64::NAN,
        }
    }
}

/// One decoded channel: its metadata and the raw int16 samples from every
/// data record, concatenated in record order. Samples are unscaled; the
/// physical/digital bounds are carried as metadata only.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub header: SignalHeader,
    pub samples: Vec<i16>,
}

impl Signal {
    pub fn label(&self) -> &str {
        &self.header.label
    }
}

/// A time-stamped annotation from the EDF+ annotation channel.
///
/// Onset and duration are in milliseconds. An absent duration is distinct
/// from a duration of zero, and an absent note marks a bare time-keeping
/// entry rather than an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub onset: f64,
    pub duration: Option<f64>,
    pub note: Option<String>,
}

impl Annotation {
    /// True for the onset-only marker each record uses to anchor its start.
    pub fn is_time_keeping(&self) -> bool {
        self.duration.is_none() && self.note.is_none()
    }
}

/// The fully assembled result of decoding one EDF/EDF+ buffer.
///
/// Immutable once built; decoding two buffers shares no state. The
/// annotation and checksum channels never appear in `signals`.
///
/// ```rust
/// let bytes = edfread::doctest_utils::sleep_study_bytes();
/// let recording = edfread::decode(&bytes)?;
///
/// for signal in &recording.signals {
///     println!("{}: {} samples", signal.label(), signal.samples.len());
/// }
/// for annotation in &recording.annotations {
///     println!("{} ms: {:?}", annotation.onset, annotation.note);
/// }
/// # Ok::<(), edfread::EdfError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Absolute UTC start of the recording; `None` when the header's date
    /// or time fields are malformed.
    pub start_instant: Option<DateTime<Utc>>,
    /// `record_duration * record_count`, in milliseconds. NaN when the
    /// record duration is unparsable.
    pub duration_millis: f64,
    pub signals: Vec<Signal>,
    pub annotations: Vec<Annotation>,
}

impl Recording {
    /// Decodes a complete in-memory EDF/EDF+ buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Recording> {
        crate::reader::decode(bytes)
    }

    /// Reads a file into memory and decodes it.
    ///
    /// The format requires whole-buffer access (header offsets point into
    /// later data, and the first record's annotations are special), so the
    /// file is loaded in full before decoding starts.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Recording> {
        let bytes = std::fs::read(path)?;
        crate::reader::decode(&bytes)
    }

    /// The table row count: the longest retained signal's sample count.
    pub fn row_count(&self) -> usize {
        self.signals
            .iter()
            .map(|signal| signal.samples.len())
            .max()
            .unwrap_or(0)
    }

    /// A lazy sequence of evenly spaced sample timestamps.
    ///
    /// Length equals [`row_count`](Self::row_count), the first value is the
    /// start instant and the step is `duration / length`, so the last value
    /// is one step short of `start + duration`. Returns `None` when the
    /// start instant is unresolvable or the duration is not finite.
    ///
    /// ```rust
    /// let bytes = edfread::doctest_utils::sleep_study_bytes();
    /// let recording = edfread::decode(&bytes)?;
    ///
    /// let timestamps: Vec<_> = recording.timestamps().unwrap().collect();
    /// assert_eq!(timestamps.len(), recording.row_count());
    /// assert_eq!(timestamps[0], recording.start_instant.unwrap());
    /// # Ok::<(), edfread::EdfError>(())
    /// ```
    pub fn timestamps(&self) -> Option<Timestamps> {
        let start = self.start_instant?;
        if !self.duration_millis.is_finite() {
            return None;
        }
        let len = self.row_count();
        let step_millis = if len == 0 {
            0.0
        } else {
            self.duration_millis / len as f64
        };
        Some(Timestamps {
            start,
            step_millis,
            len,
            index: 0,
        })
    }
}

/// Iterator over evenly spaced sample timestamps; see
/// [`Recording::timestamps`]. Finite and restartable: cloning (or asking the
/// recording again) yields a fresh pass over the same sequence.
#[derive(Debug, Clone)]
pub struct Timestamps {
    start: DateTime<Utc>,
    step_millis: f64,
    len: usize,
    index: usize,
}

impl Iterator for Timestamps {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<DateTime<Utc>> {
        if self.index >= self.len {
            return None;
        }
        // Offsets accumulate in f64 milliseconds and round to whole
        // microseconds, keeping fractional-millisecond steps strictly
        // increasing.
        let micros = (self.index as f64 * self.step_millis * 1000.0).round() as i64;
        self.index += 1;
        Some(self.start + Duration::microseconds(micros))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Timestamps {}
