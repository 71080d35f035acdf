//! Container formats for carriers.
//!
//! The codec works on raw pixel grids and sample streams. This module is the
//! collaborator that gets them in and out of files:
//! - PNG / BMP images via `image` (written back as PNG)
//! - 8/16-bit PCM WAV via `hound`

pub mod audio;
pub mod image;

use std::path::Path;

use thiserror::Error;

use crate::stego::{Carrier, StegoError};

pub use audio::WavCarrier;

/// Errors from reading or writing carrier files.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("Image save error: {0}")]
    ImageSave(String),

    #[error("Audio load error: {0}")]
    AudioLoad(String),

    #[error("Audio save error: {0}")]
    AudioSave(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Carrier error: {0}")]
    Carrier(#[from] StegoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Container format, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Png,
    Bmp,
    Wav,
}

impl MediaKind {
    /// Sniffs the container from the first bytes of a file.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

        if bytes.starts_with(PNG_MAGIC) {
            Some(Self::Png)
        } else if bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            Some(Self::Wav)
        } else {
            None
        }
    }

    /// MIME type, as reported to the web layer.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
            Self::Wav => "audio/wav",
        }
    }

    /// Extension of the file written back after encoding.
    pub fn output_extension(&self) -> &'static str {
        match self {
            Self::Png | Self::Bmp => "png",
            Self::Wav => "wav",
        }
    }

    /// Whether `path` carries the extension of the file that will actually be
    /// written (case-insensitive).
    pub fn matches_output(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(self.output_extension()))
    }
}

/// A carrier together with what is needed to write it back.
#[derive(Debug, Clone)]
pub struct LoadedCarrier {
    pub kind: MediaKind,
    pub carrier: Carrier,
    wav: Option<WavCarrier>,
}

impl LoadedCarrier {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MediaError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MediaError> {
        let kind = MediaKind::detect(bytes).ok_or_else(|| {
            MediaError::UnsupportedFormat("expected a PNG, BMP or WAV file".to_string())
        })?;

        let loaded = match kind {
            MediaKind::Png | MediaKind::Bmp => Self {
                kind,
                carrier: Carrier::Pixels(image::load_bytes(bytes)?),
                wav: None,
            },
            MediaKind::Wav => {
                let wav = WavCarrier::from_bytes(bytes)?;
                log::debug!(
                    "wav: {} Hz, {} channel(s), {:.2}s",
                    wav.spec.sample_rate,
                    wav.spec.channels,
                    wav.duration_secs()
                );
                Self {
                    kind,
                    carrier: Carrier::Samples(wav.samples.clone()),
                    wav: Some(wav),
                }
            }
        };

        log::debug!(
            "loaded {} carrier ({})",
            loaded.kind.mime_type(),
            loaded.carrier.kind()
        );
        Ok(loaded)
    }

    /// Serialises `carrier` (typically an encoded copy of this one) in the
    /// same container family.
    pub fn to_bytes(&self, carrier: &Carrier) -> Result<Vec<u8>, MediaError> {
        match (carrier, &self.wav) {
            (Carrier::Pixels(grid), _) => image::to_png_bytes(grid),
            (Carrier::Samples(samples), Some(wav)) => {
                wav.with_samples(samples.clone()).to_wav_bytes()
            }
            (Carrier::Samples(_), None) => Err(MediaError::UnsupportedFormat(
                "sample carrier has no WAV header to write with".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::{PixelGrid, SampleStream};
    use hound::{SampleFormat, WavSpec};

    fn wav_bytes() -> Vec<u8> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        WavCarrier {
            spec,
            samples: SampleStream::I16((0..256).map(|i| i * 100).collect()),
        }
        .to_wav_bytes()
        .unwrap()
    }

    #[test]
    fn test_detect() {
        let png = image::to_png_bytes(&PixelGrid::zeroed(2, 2, 3).unwrap()).unwrap();
        assert_eq!(MediaKind::detect(&png), Some(MediaKind::Png));
        assert_eq!(MediaKind::detect(&wav_bytes()), Some(MediaKind::Wav));
        assert_eq!(MediaKind::detect(b"BM\0\0"), Some(MediaKind::Bmp));
        assert_eq!(MediaKind::detect(b"RIFF"), None);
        assert_eq!(MediaKind::detect(b"GIF89a"), None);
    }

    #[test]
    fn test_load_wav() {
        let loaded = LoadedCarrier::from_bytes(&wav_bytes()).unwrap();
        assert_eq!(loaded.kind, MediaKind::Wav);
        assert_eq!(loaded.kind.mime_type(), "audio/wav");
        assert!(matches!(loaded.carrier, Carrier::Samples(SampleStream::I16(ref s)) if s.len() == 256));
    }

    #[test]
    fn test_write_back_wav() {
        let loaded = LoadedCarrier::from_bytes(&wav_bytes()).unwrap();
        let bytes = loaded.to_bytes(&loaded.carrier).unwrap();
        let reloaded = LoadedCarrier::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.carrier, loaded.carrier);
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            LoadedCarrier::from_bytes(b"plain text"),
            Err(MediaError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carrier.png");
        let grid = PixelGrid::zeroed(8, 8, 3).unwrap();
        std::fs::write(&path, image::to_png_bytes(&grid).unwrap()).unwrap();

        let loaded = LoadedCarrier::from_file(&path).unwrap();
        assert_eq!(loaded.kind.output_extension(), "png");
        assert_eq!(loaded.carrier, Carrier::Pixels(grid));
    }

    #[test]
    fn test_bmp_is_written_as_png() {
        assert_eq!(MediaKind::Bmp.output_extension(), "png");
        assert!(!MediaKind::Bmp.matches_output(Path::new("out.bmp")));
        assert!(MediaKind::Bmp.matches_output(Path::new("out.PNG")));
        assert!(MediaKind::Png.matches_output(Path::new("dir/out.png")));
        assert!(!MediaKind::Png.matches_output(Path::new("out")));
        assert!(MediaKind::Wav.matches_output(Path::new("out.wav")));
        assert!(!MediaKind::Wav.matches_output(Path::new("out.png")));
    }
}
