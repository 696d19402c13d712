//! # EDF/EDF+ decoder for Rust
//!
//! A pure Rust decoder for EDF and EDF+ (European Data Format) files, the
//! binary container used for multi-channel biosignal recordings such as
//! sleep-study polysomnography: EEG, body temperature, airflow and the
//! like, stored as interleaved 16-bit sample records behind a fixed-width
//! ASCII header.
//!
//! The decoder works on one complete in-memory buffer and produces an
//! immutable [`Recording`]: the channel columns (raw, unscaled int16
//! samples plus their calibration metadata), the annotation list decoded
//! from the EDF+ TAL channel, the UTC start instant and the total duration.
//! Writing EDF files and verifying the embedded `Crc16` channel are out of
//! scope.
//!
//! ## Quick start
//!
//! ```rust
//! use edfread::Recording;
//!
//! # let bytes = edfread::doctest_utils::sleep_study_bytes();
//! // let bytes = std::fs::read("night01.edf")?; -- or Recording::from_file
//! let recording = Recording::from_bytes(&bytes)?;
//!
//! println!("recorded at {:?}", recording.start_instant);
//! println!("duration {} ms", recording.duration_millis);
//!
//! for signal in &recording.signals {
//!     println!(
//!         "{}: {} samples [{}]",
//!         signal.label(),
//!         signal.samples.len(),
//!         signal.header.physical_dimension,
//!     );
//! }
//! # assert_eq!(recording.signals.len(), 2);
//! # Ok::<(), edfread::EdfError>(())
//! ```
//!
//! ## Annotations
//!
//! EDF+ files carry events (sleep stages, apneas, artifacts) in a dedicated
//! `"EDF Annotations"` channel. It never shows up as a signal; its content
//! is decoded into [`Annotation`] values with millisecond onsets:
//!
//! ```rust
//! # let bytes = edfread::doctest_utils::sleep_study_bytes();
//! let recording = edfread::decode(&bytes)?;
//!
//! for annotation in &recording.annotations {
//!     match (&annotation.note, annotation.duration) {
//!         (Some(note), Some(ms)) => println!("{} for {} ms: {}", annotation.onset, ms, note),
//!         (Some(note), None) => println!("{}: {}", annotation.onset, note),
//!         _ => println!("{}: time-keeping marker", annotation.onset),
//!     }
//! }
//! # assert_eq!(recording.annotations.len(), 2);
//! # Ok::<(), edfread::EdfError>(())
//! ```
//!
//! ## Raw vs physical values
//!
//! Samples are stored exactly as they appear on disk. The per-signal
//! calibration bounds are metadata; apply them explicitly when physical
//! units are wanted:
//!
//! ```rust
//! # let bytes = edfread::doctest_utils::sleep_study_bytes();
//! let recording = edfread::decode(&bytes)?;
//! let temperature = &recording.signals[1];
//!
//! let celsius: Vec<f64> = temperature
//!     .samples
//!     .iter()
//!     .map(|&raw| temperature.header.to_physical(raw))
//!     .collect();
//! # assert!(celsius.iter().all(|&c| c > 34.0 && c < 41.0));
//! # Ok::<(), edfread::EdfError>(())
//! ```

pub mod error;
pub mod reader;
pub mod tal;
pub mod timestamp;
pub mod types;
pub mod utils;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{EdfError, Result};
pub use reader::{decode, decode_header, decode_signal_headers};
pub use types::{Annotation, Header, Recording, Signal, SignalHeader, Timestamps};

/// Size of the fixed global header, in bytes.
pub const HEADER_SIZE: usize = 256;
/// Size of one signal's share of the signal header, in bytes.
pub const SIGNAL_HEADER_SIZE: usize = 256;
/// Label of the EDF+ annotation channel. Matched exactly; never emitted as
/// a signal.
pub const ANNOTATIONS_LABEL: &str = "EDF Annotations";
/// Label of the embedded checksum channel. Matched exactly; extracted but
/// never verified, and never emitted as a signal.
pub const CHECKSUM_LABEL: &str = "Crc16";

/// Library version
///
/// ```rust
/// let version = edfread::version();
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
