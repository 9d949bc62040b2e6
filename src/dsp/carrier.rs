//! Carrier generation and product detection.
//!
//! The carrier is computed directly from the sample index,
//! `cos(2π·f·n/fs)`, rather than through a free-running phase accumulator:
//! coherent detection requires the demodulator's local oscillator to be
//! bit-identical to the one used at modulation time, and index-locked
//! generation guarantees that for any two calls with the same frequency and
//! rate.

use std::f64::consts::PI;

/// Generate `len` samples of a cosine carrier at `frequency_hz`.
pub fn carrier_wave(frequency_hz: f64, sample_rate: f64, len: usize) -> Vec<f64> {
    let step = 2.0 * PI * frequency_hz / sample_rate;
    (0..len).map(|n| (step * n as f64).cos()).collect()
}

/// Multiply a buffer element-wise with the carrier at `frequency_hz`.
///
/// At modulation time this is AM-DSB-SC: the baseband spectrum is shifted
/// to ±f_c with no discrete tone at the carrier itself. At detection time
/// the same product shifts the isolated band back to baseband plus an
/// image at 2·f_c for the post-detection low-pass to remove.
pub fn mix_with_carrier(samples: &[f64], frequency_hz: f64, sample_rate: f64) -> Vec<f64> {
    let step = 2.0 * PI * frequency_hz / sample_rate;
    samples
        .iter()
        .enumerate()
        .map(|(n, &s)| s * (step * n as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_starts_at_one() {
        let wave = carrier_wave(4_000.0, 44_100.0, 8);
        assert!((wave[0] - 1.0).abs() < 1e-12, "cos(0) should be 1");
    }

    #[test]
    fn carrier_stays_in_range() {
        let wave = carrier_wave(14_000.0, 44_100.0, 44_100);
        assert!(wave.iter().all(|s| s.abs() <= 1.0 + 1e-12));
    }

    #[test]
    fn carrier_period_matches_frequency() {
        // 4410 Hz at 44100 Hz is exactly 10 samples per cycle.
        let wave = carrier_wave(4_410.0, 44_100.0, 30);
        assert!((wave[10] - wave[0]).abs() < 1e-9);
        assert!((wave[20] - wave[0]).abs() < 1e-9);
    }

    #[test]
    fn mixing_is_coherent_with_generation() {
        // Mixing a flat signal must reproduce the carrier itself.
        let flat = vec![1.0; 128];
        let mixed = mix_with_carrier(&flat, 10_000.0, 44_100.0);
        let wave = carrier_wave(10_000.0, 44_100.0, 128);
        assert_eq!(mixed, wave);
    }

    #[test]
    fn double_mixing_produces_dc_plus_double_frequency() {
        // cos² = 1/2 + cos(2ωn)/2 — the mean over whole cycles is 1/2.
        let fs = 44_100.0;
        let flat = vec![1.0; 440]; // whole number of 2·4410 Hz cycles
        let detected = mix_with_carrier(&mix_with_carrier(&flat, 4_410.0, fs), 4_410.0, fs);
        let mean = detected.iter().sum::<f64>() / detected.len() as f64;
        assert!((mean - 0.5).abs() < 1e-9, "mean {mean}");
    }
}
