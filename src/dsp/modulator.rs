//! AM-DSB-SC modulation and channel summation.
//!
//! Each conditioned baseband is multiplied by its channel's carrier cosine,
//! the modulated channels are summed sample-wise, and the composite is
//! normalized to unit peak. No component signal is mutated.

use crate::config::{ChannelDescriptor, FdmConfig};
use crate::dsp::carrier::mix_with_carrier;
use crate::error::FdmError;
use crate::signal::{MultiplexedSignal, Signal, normalize};

/// Combines conditioned baseband signals into one multiplexed composite.
#[derive(Debug, Clone)]
pub struct Modulator {
    sample_rate: f64,
}

impl Modulator {
    pub fn new(config: &FdmConfig) -> Self {
        Modulator { sample_rate: config.sample_rate }
    }

    /// Modulate each `(baseband, descriptor)` entry onto its carrier and
    /// sum the results into a unit-peak composite.
    ///
    /// Entries must share the session sample rate and the conditioner's
    /// fixed length.
    pub fn modulate(
        &self,
        entries: &[(Signal, ChannelDescriptor)],
    ) -> Result<MultiplexedSignal, FdmError> {
        let Some((first, _)) = entries.first() else {
            return Err(FdmError::EmptySignal { stage: "modulate" });
        };
        if first.is_empty() {
            return Err(FdmError::EmptySignal { stage: "modulate" });
        }
        let len = first.len();

        let mut composite = vec![0.0; len];
        for (baseband, descriptor) in entries {
            if baseband.sample_rate != self.sample_rate {
                return Err(FdmError::SampleRateMismatch {
                    expected_hz: self.sample_rate,
                    found_hz: baseband.sample_rate,
                });
            }
            if baseband.len() != len {
                return Err(FdmError::LengthMismatch {
                    expected: len,
                    found: baseband.len(),
                });
            }

            let modulated =
                mix_with_carrier(&baseband.samples, descriptor.carrier_hz, self.sample_rate);
            for (acc, s) in composite.iter_mut().zip(modulated.iter()) {
                *acc += s;
            }
        }

        Ok(MultiplexedSignal {
            signal: Signal::new(normalize(&composite), self.sample_rate),
        })
    }
}
