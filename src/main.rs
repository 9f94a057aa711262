use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};

mod converter;
mod error;
mod media;
mod sample_header;

use converter::{ConvertConfig, FileOutcome, FileReport};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert WAV samples in place to 16-bit mono at the target rate
    Convert {
        /// WAV files or directories of WAV files; with no paths, a mounted
        /// SD card is searched for the 808 and user sample directories
        paths: Vec<PathBuf>,

        /// Output sample rate in Hz
        #[arg(short, long, env = "SAMPLE_TARGET_RATE", default_value = "22050")]
        target_rate: u32,

        /// Fraction of full scale the peak normalizer aims for
        #[arg(long, env = "SAMPLE_HEADROOM", default_value = "0.95")]
        headroom: f64,
    },
    /// Embed the built-in drum kit WAVs as C headers for the firmware
    Header {
        /// Directory holding kick.wav, snare.wav, hat.wav and tom.wav
        input_dir: PathBuf,

        /// Where the generated headers go
        #[arg(default_value = "./src/samples")]
        output_dir: PathBuf,
    },
}

/// Subdirectories of the SD card that hold the handheld's samples.
const SD_SAMPLE_DIRS: [&str; 2] = ["mp3s/lbm/808", "mp3s/lbm/user"];

fn convert_directory(dir: &Path, config: &ConvertConfig) -> Result<Vec<FileReport>> {
    converter::process_directory(dir, config)
        .wrap_err_with(|| format!("failed to read directory {}", dir.display()))
}

fn run_convert(paths: Vec<PathBuf>, config: ConvertConfig) -> Result<()> {
    let mut reports = Vec::new();

    if paths.is_empty() {
        let root = media::find_removable_media().ok_or_else(|| {
            eyre!(
                "no removable media detected and no path provided\n\n\
                 Usage:\n  \
                 sample-converter convert <directory>\n  \
                 sample-converter convert <file.wav>"
            )
        })?;
        println!("Using removable media: {}", root.display());

        for subdir in SD_SAMPLE_DIRS {
            let dir = root.join(subdir);
            if !dir.is_dir() {
                println!("Directory not found: {}", dir.display());
                continue;
            }
            reports.extend(convert_directory(&dir, &config)?);
        }
    } else {
        for path in paths {
            if path.is_dir() {
                reports.extend(convert_directory(&path, &config)?);
            } else if path.is_file() && converter::has_wav_extension(&path) {
                // Single-file mode: a failure here ends the run
                let report = converter::convert_in_place(&path, &config);
                report.print();
                match &report.outcome {
                    FileOutcome::Converted(_) => {}
                    FileOutcome::Skipped(reason) => {
                        return Err(eyre!("{}: {}", path.display(), reason));
                    }
                    FileOutcome::Failed(error) => {
                        return Err(eyre!("{}: {}", path.display(), error));
                    }
                }
                reports.push(report);
            } else {
                println!("Skipping: {} (not a directory or WAV file)", path.display());
            }
        }
    }

    let converted = reports
        .iter()
        .filter(|r| matches!(r.outcome, FileOutcome::Converted(_)))
        .count();
    let skipped = reports
        .iter()
        .filter(|r| matches!(r.outcome, FileOutcome::Skipped(_)))
        .count();
    let failed = reports.len() - converted - skipped;

    println!(
        "\nConversion complete: {} converted, {} skipped, {} failed",
        converted, skipped, failed
    );
    if converted > 0 {
        println!("Originals backed up with .bak extension");
        println!(
            "All converted samples are 16-bit mono @ {} Hz",
            config.target_rate
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    match args.command {
        Commands::Convert {
            paths,
            target_rate,
            headroom,
        } => run_convert(paths, ConvertConfig::new(target_rate, headroom)),
        Commands::Header {
            input_dir,
            output_dir,
        } => {
            if !input_dir.is_dir() {
                return Err(eyre!(
                    "input directory not found: {}",
                    input_dir.display()
                ));
            }
            sample_header::process_kit(&input_dir, &output_dir)
                .wrap_err("failed to emit sample headers")
        }
    }
}
