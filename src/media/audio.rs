//! WAV carriers via `hound`.
//!
//! Only integer PCM at 8 or 16 bits per sample is supported. Interleaved
//! channels are kept interleaved: every sample is one carrier element.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::MediaError;
use crate::stego::SampleStream;

/// Decoded WAV data: the format header plus the raw samples.
#[derive(Debug, Clone)]
pub struct WavCarrier {
    pub spec: WavSpec,
    pub samples: SampleStream,
}

impl WavCarrier {
    /// Reads a WAV file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MediaError> {
        let reader = WavReader::open(path).map_err(|e| MediaError::AudioLoad(e.to_string()))?;
        Self::from_reader(reader)
    }

    /// Reads WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MediaError> {
        let reader =
            WavReader::new(Cursor::new(bytes)).map_err(|e| MediaError::AudioLoad(e.to_string()))?;
        Self::from_reader(reader)
    }

    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, MediaError> {
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int {
            return Err(MediaError::UnsupportedFormat(format!(
                "float WAV ({} bits) is not supported",
                spec.bits_per_sample
            )));
        }

        let samples = match spec.bits_per_sample {
            8 => SampleStream::I8(
                reader
                    .into_samples::<i8>()
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| MediaError::AudioLoad(e.to_string()))?,
            ),
            16 => SampleStream::I16(
                reader
                    .into_samples::<i16>()
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| MediaError::AudioLoad(e.to_string()))?,
            ),
            bits => {
                return Err(MediaError::UnsupportedFormat(format!(
                    "only 8 or 16-bit PCM WAV is supported, got {} bits",
                    bits
                )))
            }
        };

        Ok(Self { spec, samples })
    }

    /// Wraps modified samples with the original header.
    pub fn with_samples(&self, samples: SampleStream) -> Self {
        Self {
            spec: self.spec,
            samples,
        }
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        let frames = self.samples.len() / self.spec.channels.max(1) as usize;
        frames as f64 / self.spec.sample_rate as f64
    }

    /// Writes the audio to a WAV file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MediaError> {
        let writer =
            WavWriter::create(path, self.spec).map_err(|e| MediaError::AudioSave(e.to_string()))?;
        self.write_samples(writer)
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, MediaError> {
        let mut bytes = Vec::new();
        {
            let writer = WavWriter::new(Cursor::new(&mut bytes), self.spec)
                .map_err(|e| MediaError::AudioSave(e.to_string()))?;
            self.write_samples(writer)?;
        }
        Ok(bytes)
    }

    fn write_samples<W: Write + Seek>(&self, mut writer: WavWriter<W>) -> Result<(), MediaError> {
        let result = match &self.samples {
            SampleStream::I8(samples) => samples.iter().try_for_each(|s| writer.write_sample(*s)),
            SampleStream::I16(samples) => samples.iter().try_for_each(|s| writer.write_sample(*s)),
            SampleStream::U8(_) | SampleStream::U16(_) => {
                return Err(MediaError::UnsupportedFormat(
                    "WAV output needs signed samples".to_string(),
                ))
            }
        };
        result.map_err(|e| MediaError::AudioSave(e.to_string()))?;

        writer
            .finalize()
            .map_err(|e| MediaError::AudioSave(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_audio(sample_count: usize) -> WavCarrier {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let samples: Vec<i16> = (0..sample_count)
            .map(|i| {
                let t = i as f64 / 44100.0;
                (f64::sin(2.0 * std::f64::consts::PI * 440.0 * t) * 16000.0) as i16
            })
            .collect();

        WavCarrier {
            spec,
            samples: SampleStream::I16(samples),
        }
    }

    #[test]
    fn test_wav_roundtrip() {
        let audio = create_test_audio(10_000);
        let bytes = audio.to_wav_bytes().unwrap();
        let loaded = WavCarrier::from_bytes(&bytes).unwrap();

        assert_eq!(loaded.spec, audio.spec);
        assert_eq!(loaded.samples, audio.samples);
    }

    #[test]
    fn test_eight_bit_wav() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        let audio = WavCarrier {
            spec,
            samples: SampleStream::I8(vec![-128, -1, 0, 1, 127, 64]),
        };

        let loaded = WavCarrier::from_bytes(&audio.to_wav_bytes().unwrap()).unwrap();
        assert_eq!(loaded.samples, audio.samples);
    }

    #[test]
    fn test_duration() {
        let audio = create_test_audio(44100);
        assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let audio = create_test_audio(1000);

        audio.save(&path).unwrap();
        let loaded = WavCarrier::from_file(&path).unwrap();
        assert_eq!(loaded.samples, audio.samples);
    }

    #[test]
    fn test_float_wav_rejected() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            writer.write_sample(0.5f32).unwrap();
            writer.finalize().unwrap();
        }

        assert!(matches!(
            WavCarrier::from_bytes(&bytes),
            Err(MediaError::UnsupportedFormat(_))
        ));
    }
}
