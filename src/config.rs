//! Session configuration — immutable, created once, shared by both ends.
//!
//! The multiplexer and demultiplexer must agree on every parameter here for
//! coherent recovery to work; the config is therefore a single value passed
//! to each component constructor rather than per-instance hidden state.

use serde::{Deserialize, Serialize};

use crate::error::FdmError;

/// Binds a channel label to its carrier frequency and occupied half-band.
///
/// Created at session start, immutable thereafter, consumed by both the
/// modulator and the demodulator so encode/decode parameters stay symmetric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    /// Channel identifier (e.g. "A").
    pub label: String,
    /// Carrier frequency in Hz.
    pub carrier_hz: f64,
    /// Half of the band the channel occupies around its carrier, in Hz.
    /// Also the post-detection low-pass cutoff.
    pub half_bandwidth_hz: f64,
}

impl ChannelDescriptor {
    pub fn new(label: impl Into<String>, carrier_hz: f64, half_bandwidth_hz: f64) -> Self {
        ChannelDescriptor {
            label: label.into(),
            carrier_hz,
            half_bandwidth_hz,
        }
    }
}

/// Full multiplex/demultiplex session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdmConfig {
    /// Sample rate shared by every signal in the session, in Hz.
    pub sample_rate: f64,
    /// Target duration each conditioned baseband is cut or padded to, in
    /// seconds.
    pub duration_s: f64,
    /// Low-pass cutoff applied before modulation, in Hz. Deliberately below
    /// the channels' half-bandwidth to leave guard margin.
    pub baseband_cutoff_hz: f64,
    /// Butterworth order of the pre-modulation low-pass.
    pub baseband_order: usize,
    /// Butterworth order of the demultiplex band-pass and post-detection
    /// low-pass.
    pub channel_order: usize,
    /// Channels in a fixed order. Output ordering of the demultiplexer is
    /// this ordering — a stated contract, not an iteration accident.
    pub channels: Vec<ChannelDescriptor>,
}

impl Default for FdmConfig {
    fn default() -> Self {
        FdmConfig {
            sample_rate: 44_100.0,
            duration_s: 3.0,
            baseband_cutoff_hz: 1_900.0,
            baseband_order: 5,
            channel_order: 6,
            channels: vec![
                ChannelDescriptor::new("A", 4_000.0, 2_000.0),
                ChannelDescriptor::new("B", 10_000.0, 2_000.0),
                ChannelDescriptor::new("C", 14_000.0, 2_000.0),
            ],
        }
    }
}

impl FdmConfig {
    /// Nyquist frequency for this session.
    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Find a channel descriptor by label.
    pub fn channel(&self, label: &str) -> Option<&ChannelDescriptor> {
        self.channels.iter().find(|c| c.label == label)
    }

    /// Check the session preconditions before any numeric work.
    ///
    /// Adjacent channels (by carrier frequency) must be separated by at
    /// least the sum of their half-bandwidths, or their sidebands overlap
    /// and no band-pass can isolate them. Bands that touch exactly at the
    /// edge are allowed; the default plan's B and C channels do.
    pub fn validate(&self) -> Result<(), FdmError> {
        let mut sorted: Vec<&ChannelDescriptor> = self.channels.iter().collect();
        sorted.sort_by(|a, b| a.carrier_hz.total_cmp(&b.carrier_hz));

        for pair in sorted.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            let separation = hi.carrier_hz - lo.carrier_hz;
            let required = lo.half_bandwidth_hz + hi.half_bandwidth_hz;
            if separation < required {
                return Err(FdmError::CarrierOverlap {
                    first: lo.label.clone(),
                    second: hi.label.clone(),
                    separation_hz: separation,
                    required_hz: required,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_valid() {
        let config = FdmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channels.len(), 3);
        assert_eq!(config.nyquist_hz(), 22_050.0);
    }

    #[test]
    fn lookup_by_label() {
        let config = FdmConfig::default();
        assert_eq!(config.channel("B").unwrap().carrier_hz, 10_000.0);
        assert!(config.channel("D").is_none());
    }

    #[test]
    fn overlapping_carriers_rejected() {
        let mut config = FdmConfig::default();
        config.channels[1].carrier_hz = 7_000.0; // 3 kHz from A, needs > 4 kHz
        match config.validate() {
            Err(FdmError::CarrierOverlap { first, second, separation_hz, required_hz }) => {
                assert_eq!(first, "A");
                assert_eq!(second, "B");
                assert_eq!(separation_hz, 3_000.0);
                assert_eq!(required_hz, 4_000.0);
            }
            other => panic!("expected CarrierOverlap, got {other:?}"),
        }
    }

    #[test]
    fn bands_touching_at_the_edge_are_valid() {
        // B's upper sideband ends at 12 kHz, exactly where C's lower
        // sideband begins. Touching is not overlapping.
        let config = FdmConfig::default();
        assert_eq!(
            config.channels[1].carrier_hz + config.channels[1].half_bandwidth_hz,
            config.channels[2].carrier_hz - config.channels[2].half_bandwidth_hz,
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_ignores_declaration_order() {
        let config = FdmConfig {
            channels: vec![
                ChannelDescriptor::new("C", 14_000.0, 2_000.0),
                ChannelDescriptor::new("A", 4_000.0, 2_000.0),
                ChannelDescriptor::new("B", 10_000.0, 2_000.0),
            ],
            ..FdmConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = FdmConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: FdmConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
