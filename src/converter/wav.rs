use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::{ConvertError, Result};

/// A fully decoded WAV file: format parameters plus every sample, one value
/// per sample per channel, interleaved in channel order.
#[derive(Debug)]
pub struct DecodedWav {
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
    pub samples: Vec<i32>,
}

impl DecodedWav {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }
}

/// Read an integer PCM WAV file at 16 or 24 bits per sample.
pub fn read_wav(path: &Path) -> Result<DecodedWav> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int {
        return Err(ConvertError::UnsupportedEncoding(format!(
            "{:?} samples",
            spec.sample_format
        )));
    }
    if spec.bits_per_sample != 16 && spec.bits_per_sample != 24 {
        return Err(ConvertError::UnsupportedBitDepth(spec.bits_per_sample));
    }

    // hound sign-extends 24-bit samples into i32 for us
    let samples = reader
        .samples::<i32>()
        .collect::<std::result::Result<Vec<i32>, hound::Error>>()?;

    Ok(DecodedWav {
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        sample_rate: spec.sample_rate,
        samples,
    })
}

/// Write a mono 16-bit PCM WAV file at the given rate, creating or
/// overwriting `path`.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}
