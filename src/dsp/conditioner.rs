//! Pre-modulation signal conditioning.
//!
//! Raw input becomes a modulation-ready baseband in four steps: downmix to
//! mono, fix the length to the session duration, low-pass to bound the
//! occupied bandwidth below the channel guard band, and normalize to unit
//! peak.

use crate::config::FdmConfig;
use crate::dsp::filter::FilterSpec;
use crate::error::FdmError;
use crate::signal::{RawAudio, Signal, normalize};

/// Conditions raw audio into fixed-length, band-limited, unit-peak
/// baseband signals.
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    sample_rate: f64,
    duration_s: f64,
    cutoff_hz: f64,
    order: usize,
}

impl SignalConditioner {
    pub fn new(config: &FdmConfig) -> Self {
        SignalConditioner {
            sample_rate: config.sample_rate,
            duration_s: config.duration_s,
            cutoff_hz: config.baseband_cutoff_hz,
            order: config.baseband_order,
        }
    }

    /// Samples every conditioned output must have.
    pub fn target_len(&self) -> usize {
        (self.sample_rate * self.duration_s).round() as usize
    }

    /// Condition one raw input into a modulation-ready baseband.
    ///
    /// Output length is exactly [`target_len`](Self::target_len) and output
    /// peak is exactly 1.0 unless the input was identically zero.
    pub fn condition(&self, raw: &RawAudio) -> Result<Signal, FdmError> {
        if raw.channels.is_empty() || raw.channels.iter().all(Vec::is_empty) {
            return Err(FdmError::EmptySignal { stage: "condition" });
        }
        if raw.sample_rate != self.sample_rate {
            return Err(FdmError::SampleRateMismatch {
                expected_hz: self.sample_rate,
                found_hz: raw.sample_rate,
            });
        }

        let mut mono = raw.downmix();
        mono.resize(self.target_len(), 0.0); // truncate or zero-pad

        let lowpass = FilterSpec::lowpass(self.cutoff_hz, self.order, self.sample_rate).design()?;
        let band_limited = lowpass.apply(&mono);

        Ok(Signal::new(normalize(&band_limited), self.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::peak;
    use std::f64::consts::PI;

    const FS: f64 = 44_100.0;

    fn conditioner() -> SignalConditioner {
        SignalConditioner::new(&FdmConfig::default())
    }

    fn sine(freq: f64, len: usize) -> Vec<f64> {
        (0..len).map(|n| 0.5 * (2.0 * PI * freq * n as f64 / FS).sin()).collect()
    }

    #[test]
    fn output_length_is_exact_for_long_input() {
        let c = conditioner();
        let raw = RawAudio::mono(sine(440.0, c.target_len() * 2), FS);
        let out = c.condition(&raw).unwrap();
        assert_eq!(out.len(), c.target_len());
    }

    #[test]
    fn output_length_is_exact_for_short_input() {
        let c = conditioner();
        let raw = RawAudio::mono(sine(440.0, 1_000), FS);
        let out = c.condition(&raw).unwrap();
        assert_eq!(out.len(), c.target_len());
    }

    #[test]
    fn output_peak_is_unity() {
        let c = conditioner();
        let raw = RawAudio::mono(sine(440.0, c.target_len()), FS);
        let out = c.condition(&raw).unwrap();
        assert!(
            (peak(&out.samples) - 1.0).abs() < 1e-9,
            "peak {}",
            peak(&out.samples)
        );
    }

    #[test]
    fn silence_stays_silent() {
        let c = conditioner();
        let raw = RawAudio::mono(vec![0.0; 2_000], FS);
        let out = c.condition(&raw).unwrap();
        assert_eq!(out.len(), c.target_len());
        assert!(out.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn stereo_input_is_downmixed() {
        let c = conditioner();
        let raw = RawAudio {
            channels: vec![sine(440.0, 4_000), sine(440.0, 4_000)],
            sample_rate: FS,
        };
        let out = c.condition(&raw).unwrap();
        assert_eq!(out.len(), c.target_len());
        assert!((peak(&out.samples) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_band_content_is_attenuated() {
        // A 10 kHz tone is far above the 1900 Hz baseband cutoff; after
        // conditioning, the *unnormalized* filter output would be tiny, so
        // compare against a 440 Hz tone via the ratio of pre-normalization
        // peaks using the filter directly.
        let lowpass = FilterSpec::lowpass(1_900.0, 5, FS).design().unwrap();
        let in_band = peak(&lowpass.apply(&sine(440.0, 8_192))[1_000..]);
        let out_of_band = peak(&lowpass.apply(&sine(10_000.0, 8_192))[1_000..]);
        assert!(
            out_of_band < in_band * 0.05,
            "10 kHz peak {out_of_band} vs 440 Hz peak {in_band}"
        );
    }

    #[test]
    fn empty_input_rejected() {
        let c = conditioner();
        let raw = RawAudio::mono(Vec::new(), FS);
        assert_eq!(
            c.condition(&raw).unwrap_err(),
            FdmError::EmptySignal { stage: "condition" }
        );
    }

    #[test]
    fn wrong_sample_rate_rejected() {
        let c = conditioner();
        let raw = RawAudio::mono(vec![0.5; 100], 48_000.0);
        assert_eq!(
            c.condition(&raw).unwrap_err(),
            FdmError::SampleRateMismatch {
                expected_hz: FS,
                found_hz: 48_000.0,
            }
        );
    }
}
