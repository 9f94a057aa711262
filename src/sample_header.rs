use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{ConvertError, Result};

/// The built-in drum kit baked into the firmware: WAV file name to C
/// identifier.
const KIT_SAMPLES: [(&str, &str); 4] = [
    ("kick.wav", "sample_808_kick"),
    ("snare.wav", "sample_808_snare"),
    ("hat.wav", "sample_808_hat"),
    ("tom.wav", "sample_808_tom"),
];

pub struct EmbeddedSample {
    pub sample_rate: u32,
    pub sample_count: usize,
}

/// Render a 16-bit WAV file as a C header declaring a PROGMEM sample
/// array plus rate and length constants. Stereo input keeps the left
/// channel; the firmware mixes in mono.
pub fn wav_to_header(wav_path: &Path, var_name: &str) -> Result<(String, EmbeddedSample)> {
    let mut reader = hound::WavReader::open(wav_path)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(ConvertError::UnsupportedBitDepth(spec.bits_per_sample));
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, hound::Error>>()?;
    let samples: Vec<i16> = if spec.channels > 1 {
        samples
            .iter()
            .copied()
            .step_by(spec.channels as usize)
            .collect()
    } else {
        samples
    };

    let sample_count = samples.len();
    let guard = format!("{}_H", var_name.to_uppercase());
    let source_name = wav_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| wav_path.display().to_string());

    let mut header = String::new();
    let _ = writeln!(header, "// Auto-generated from {}", source_name);
    let _ = writeln!(
        header,
        "// Sample rate: {} Hz, Samples: {}, Size: {} bytes",
        spec.sample_rate,
        sample_count,
        sample_count * 2
    );
    let _ = writeln!(header);
    let _ = writeln!(header, "#ifndef {}", guard);
    let _ = writeln!(header, "#define {}", guard);
    let _ = writeln!(header);
    let _ = writeln!(header, "#include <Arduino.h>");
    let _ = writeln!(header);
    let _ = writeln!(header, "const uint32_t {}_rate = {};", var_name, spec.sample_rate);
    let _ = writeln!(header, "const uint32_t {}_length = {};", var_name, sample_count);
    let _ = writeln!(header);
    let _ = writeln!(header, "const int16_t {}_data[] PROGMEM = {{", var_name);

    // Eight values per line, right-aligned the way the firmware tree
    // formats its other sample tables
    for (i, chunk) in samples.chunks(8).enumerate() {
        let values: Vec<String> = chunk.iter().map(|s| format!("{:6}", s)).collect();
        let mut line = format!("  {}", values.join(", "));
        if (i + 1) * 8 < sample_count {
            line.push(',');
        }
        let _ = writeln!(header, "{}", line);
    }

    let _ = writeln!(header, "}};");
    let _ = writeln!(header);
    let _ = writeln!(header, "#endif // {}", guard);

    Ok((
        header,
        EmbeddedSample {
            sample_rate: spec.sample_rate,
            sample_count,
        },
    ))
}

/// Emit a header for each drum kit WAV present in `input_dir`. Missing or
/// unreadable samples are reported and skipped.
pub fn process_kit(input_dir: &Path, output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    println!("Converting WAV files to C headers...");
    println!("Input:  {}", input_dir.display());
    println!("Output: {}\n", output_dir.display());

    let mut total_size = 0usize;
    for (filename, var_name) in KIT_SAMPLES {
        let wav_path = input_dir.join(filename);
        if !wav_path.exists() {
            println!("Skipping {} (not found)", filename);
            continue;
        }

        let (header, info) = match wav_to_header(&wav_path, var_name) {
            Ok(result) => result,
            Err(e) => {
                println!("Skipping {} ({})", filename, e);
                continue;
            }
        };

        let header_name = format!("{}.h", var_name);
        fs::write(output_dir.join(&header_name), &header)?;

        let size_bytes = info.sample_count * 2;
        total_size += size_bytes;
        println!(
            "{:12} -> {:25} ({:5} Hz, {:6} samples, {:7} bytes)",
            filename, header_name, info.sample_rate, info.sample_count, size_bytes
        );
    }

    println!(
        "\nTotal size: {} bytes ({:.1} KB)",
        total_size,
        total_size as f64 / 1024.0
    );
    println!("Headers saved to: {}", output_dir.display());

    Ok(())
}
