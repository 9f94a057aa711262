use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::converter::config::ConvertConfig;
use crate::converter::stages::{
    mix_down_to_mono, normalize_peak, reduce_to_16_bit, resample_nearest,
};
use crate::converter::wav::{read_wav, write_wav};
use crate::error::{ConvertError, Result};

/// What happened to one file, as a value rather than an error, so a bad
/// file can never knock over the rest of a batch.
#[derive(Debug)]
pub enum FileOutcome {
    Converted(ConversionSummary),
    Skipped(String),
    Failed(ConvertError),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    /// One line per file on stdout, whatever the outcome.
    pub fn print(&self) {
        match &self.outcome {
            FileOutcome::Converted(s) => {
                println!(
                    "{}: {}ch {}-bit {}Hz {} frames -> mono 16-bit {}Hz {} frames, {} -> {} bytes, backup {}",
                    self.path.display(),
                    s.source_channels,
                    s.source_bits,
                    s.source_rate,
                    s.source_frames,
                    s.output_rate,
                    s.output_frames,
                    s.bytes_before,
                    s.bytes_after,
                    s.backup.display(),
                );
            }
            FileOutcome::Skipped(reason) => {
                println!("{}: skipped ({})", self.path.display(), reason);
            }
            FileOutcome::Failed(error) => {
                println!("{}: FAILED ({})", self.path.display(), error);
            }
        }
    }
}

/// Properties gathered while converting one file, for the per-file report.
#[derive(Debug)]
pub struct ConversionSummary {
    pub source_channels: u16,
    pub source_bits: u16,
    pub source_rate: u32,
    pub source_frames: usize,
    pub output_rate: u32,
    pub output_frames: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
    pub backup: PathBuf,
}

/// Run the full pipeline from `input` into `output`, leaving `input`
/// untouched. The summary's backup path is filled in by the caller.
pub fn convert_wav(
    input: &Path,
    output: &Path,
    config: &ConvertConfig,
) -> Result<ConversionSummary> {
    let decoded = read_wav(input)?;
    let source_frames = decoded.frames();

    let samples = reduce_to_16_bit(&decoded.samples, decoded.bits_per_sample);
    let samples = mix_down_to_mono(&samples, decoded.channels);
    let samples = resample_nearest(&samples, decoded.sample_rate, config.target_rate);
    let samples = normalize_peak(&samples, config.headroom);

    write_wav(output, &samples, config.target_rate)?;

    Ok(ConversionSummary {
        source_channels: decoded.channels,
        source_bits: decoded.bits_per_sample,
        source_rate: decoded.sample_rate,
        source_frames,
        output_rate: config.target_rate,
        output_frames: samples.len(),
        bytes_before: fs::metadata(input)?.len(),
        bytes_after: fs::metadata(output)?.len(),
        backup: PathBuf::new(),
    })
}

/// Convert one file in place: back up the original once, convert into a
/// temporary next to it, and swap the temporary in only on success.
pub fn convert_in_place(path: &Path, config: &ConvertConfig) -> FileReport {
    FileReport {
        path: path.to_path_buf(),
        outcome: convert_in_place_outcome(path, config),
    }
}

fn convert_in_place_outcome(path: &Path, config: &ConvertConfig) -> FileOutcome {
    // The first backup is the one that counts: never refresh it, or a
    // second run would overwrite the true original with converted audio.
    let backup_path = path_with_suffix(path, ".bak");
    if !backup_path.exists() {
        if let Err(e) = fs::copy(path, &backup_path) {
            return FileOutcome::Failed(e.into());
        }
    }

    let temp_path = path_with_suffix(path, ".tmp");
    match convert_wav(path, &temp_path, config) {
        Ok(mut summary) => {
            if let Err(e) = fs::rename(&temp_path, path) {
                let _ = fs::remove_file(&temp_path);
                return FileOutcome::Failed(e.into());
            }
            summary.backup = backup_path;
            FileOutcome::Converted(summary)
        }
        Err(e) => {
            if temp_path.exists() {
                let _ = fs::remove_file(&temp_path);
            }
            if e.is_unsupported() {
                FileOutcome::Skipped(e.to_string())
            } else {
                FileOutcome::Failed(e)
            }
        }
    }
}

/// Convert every `.wav` file directly inside `dir`, in listing order,
/// printing one line per file. A bad file is reported and the batch moves
/// on.
pub fn process_directory(dir: &Path, config: &ConvertConfig) -> Result<Vec<FileReport>> {
    let mut wav_files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_wav_extension(&path) {
            wav_files.push(path);
        }
    }

    if wav_files.is_empty() {
        println!("No WAV files found in: {}", dir.display());
        return Ok(Vec::new());
    }

    println!(
        "Processing {} file{} in: {}",
        wav_files.len(),
        if wav_files.len() == 1 { "" } else { "s" },
        dir.display()
    );

    let mut reports = Vec::with_capacity(wav_files.len());
    for path in wav_files {
        let report = convert_in_place(&path, config);
        report.print();
        reports.push(report);
    }
    Ok(reports)
}

pub fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

fn path_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn write_sine_24_bit_stereo(path: &Path, frames: usize) {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 24,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            let phase = i as f64 * 2.0 * std::f64::consts::PI * 440.0 / 44100.0;
            let sample = (phase.sin() * 4_000_000.0) as i32;
            // Same signal on both channels
            writer.write_sample(sample).unwrap();
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn write_16_bit_mono(path: &Path, sample_rate: u32, samples: &[i16]) {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn full_pipeline_halves_and_normalizes_a_24_bit_stereo_sine() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sine.wav");
        let output = dir.path().join("out.wav");
        write_sine_24_bit_stereo(&input, 4410);

        let summary = convert_wav(&input, &output, &ConvertConfig::default()).unwrap();

        assert_eq!(summary.source_channels, 2);
        assert_eq!(summary.source_bits, 24);
        assert_eq!(summary.source_rate, 44100);
        assert_eq!(summary.source_frames, 4410);
        assert_eq!(summary.output_rate, 22050);
        assert!((summary.output_frames as i64 - 2205).abs() <= 1);

        let reader = hound::WavReader::open(&output).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 22050);

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        let peak = samples.iter().map(|&s| (s as i32).abs()).max().unwrap();
        let target = 32767.0 * 0.95;
        assert!(
            (peak as f64 - target).abs() / target < 0.01,
            "peak {} not within 1% of {}",
            peak,
            target
        );
    }

    #[test]
    fn in_place_conversion_backs_up_the_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clap.wav");
        write_16_bit_mono(&path, 44100, &[0, 1000, -1000, 500]);
        let original_bytes = fs::read(&path).unwrap();

        let report = convert_in_place(&path, &ConvertConfig::default());
        let FileOutcome::Converted(summary) = &report.outcome else {
            panic!("expected conversion, got {:?}", report.outcome);
        };

        assert_eq!(summary.backup, dir.path().join("clap.wav.bak"));
        assert_eq!(fs::read(&summary.backup).unwrap(), original_bytes);
        assert!(!dir.path().join("clap.wav.tmp").exists());
    }

    #[test]
    fn second_run_keeps_the_first_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kick.wav");
        write_16_bit_mono(&path, 44100, &[0, 2000, -2000, 1000]);
        let original_bytes = fs::read(&path).unwrap();

        let config = ConvertConfig::default();
        let first = convert_in_place(&path, &config);
        assert!(matches!(first.outcome, FileOutcome::Converted(_)));
        let second = convert_in_place(&path, &config);
        assert!(matches!(second.outcome, FileOutcome::Converted(_)));

        // The backup still holds the pre-first-run bytes, not the
        // once-converted intermediate
        let backup = dir.path().join("kick.wav.bak");
        assert_eq!(fs::read(&backup).unwrap(), original_bytes);
    }

    #[test]
    fn a_corrupt_file_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.wav");
        let bad = dir.path().join("bad.wav");
        write_16_bit_mono(&good, 44100, &[0, 3000, -3000]);
        fs::write(&bad, b"definitely not audio").unwrap();

        let reports = process_directory(dir.path(), &ConvertConfig::default()).unwrap();
        assert_eq!(reports.len(), 2);

        let good_report = reports.iter().find(|r| r.path == good).unwrap();
        assert!(matches!(good_report.outcome, FileOutcome::Converted(_)));

        let bad_report = reports.iter().find(|r| r.path == bad).unwrap();
        assert!(matches!(bad_report.outcome, FileOutcome::Failed(_)));
        // The corrupt file itself is untouched
        assert_eq!(fs::read(&bad).unwrap(), b"definitely not audio");
        assert!(!dir.path().join("bad.wav.tmp").exists());
    }

    #[test]
    fn unsupported_depth_is_reported_as_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lofi.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(1i8).unwrap();
        writer.finalize().unwrap();
        let original_bytes = fs::read(&path).unwrap();

        let report = convert_in_place(&path, &ConvertConfig::default());
        assert!(matches!(report.outcome, FileOutcome::Skipped(_)));
        assert_eq!(fs::read(&path).unwrap(), original_bytes);
    }

    #[test]
    fn directory_scan_ignores_backups_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write_16_bit_mono(&dir.path().join("a.wav"), 22050, &[100]);
        fs::write(dir.path().join("a.wav.bak"), b"old").unwrap();
        fs::write(dir.path().join("notes.txt"), b"not audio").unwrap();

        let reports = process_directory(dir.path(), &ConvertConfig::default()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].path, dir.path().join("a.wav"));
        // The stale .bak was left alone
        assert_eq!(fs::read(dir.path().join("a.wav.bak")).unwrap(), b"old");
    }

    #[test]
    fn already_target_rate_mono_only_changes_by_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        let samples = vec![1000i16, -2000, 1500, -500];
        write_16_bit_mono(&input, 22050, &samples);

        convert_wav(&input, &output, &ConvertConfig::default()).unwrap();

        let converted: Vec<i16> = hound::WavReader::open(&output)
            .unwrap()
            .into_samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        assert_eq!(converted.len(), samples.len());
        let scale = 32767.0 * 0.95 / 2000.0;
        for (&before, &after) in samples.iter().zip(converted.iter()) {
            assert_eq!(after, (before as f64 * scale) as i16);
        }
    }
}
