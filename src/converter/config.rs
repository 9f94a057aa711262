/// Settings for one conversion run, passed explicitly into every call so
/// there is no process-wide configuration to mutate.
#[derive(Debug, Clone, Copy)]
pub struct ConvertConfig {
    /// Output sample rate in Hz. 22050 is half of CD rate, which is plenty
    /// for the handheld's speaker.
    pub target_rate: u32,
    /// Fraction of full scale the peak normalizer aims for. The remainder
    /// is headroom against clipping on playback.
    pub headroom: f64,
}

impl ConvertConfig {
    pub fn new(target_rate: u32, headroom: f64) -> Self {
        Self {
            target_rate,
            headroom,
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            target_rate: 22050,
            headroom: 0.95,
        }
    }
}
