mod batch;
mod config;
mod stages;
mod wav;

pub use batch::{
    ConversionSummary, FileOutcome, FileReport, convert_in_place, has_wav_extension,
    process_directory,
};
pub use config::ConvertConfig;
