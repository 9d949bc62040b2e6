pub mod config;
pub mod dsp;
pub mod error;
#[cfg(feature = "wav")]
pub mod io;
pub mod signal;

use wasm_bindgen::prelude::*;

use crate::config::{ChannelDescriptor, FdmConfig};
use crate::dsp::conditioner::SignalConditioner;
use crate::dsp::demodulator::Demodulator;
use crate::dsp::modulator::Modulator;
use crate::error::FdmError;
use crate::signal::{MultiplexedSignal, RawAudio, Signal};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the fdmux version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Everything the multiplex stage produces: the composite for transmission
/// or persistence, plus the conditioned baseband per channel so recovered
/// channels can be compared against them later.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplexResult {
    pub composite: MultiplexedSignal,
    pub conditioned: Vec<(String, Signal)>,
}

/// Condition each raw input and modulate it onto its channel's carrier.
///
/// Inputs pair with `config.channels` by position; the counts must match.
pub fn multiplex(inputs: &[RawAudio], config: &FdmConfig) -> Result<MultiplexResult, FdmError> {
    config.validate()?;
    if inputs.len() != config.channels.len() {
        return Err(FdmError::ChannelCountMismatch {
            expected: config.channels.len(),
            found: inputs.len(),
        });
    }

    let conditioner = SignalConditioner::new(config);
    let entries: Vec<(Signal, ChannelDescriptor)> = inputs
        .iter()
        .zip(config.channels.iter())
        .map(|(raw, descriptor)| Ok((conditioner.condition(raw)?, descriptor.clone())))
        .collect::<Result<_, FdmError>>()?;

    let composite = Modulator::new(config).modulate(&entries)?;
    let conditioned = entries
        .into_iter()
        .map(|(signal, descriptor)| (descriptor.label, signal))
        .collect();

    Ok(MultiplexResult { composite, conditioned })
}

/// Recover every configured channel from a composite, in channel order.
pub fn demultiplex(
    muxed: &MultiplexedSignal,
    config: &FdmConfig,
) -> Result<Vec<(String, Signal)>, FdmError> {
    config.validate()?;
    Demodulator::new(config).demultiplex(muxed, &config.channels)
}

/// WASM-exposed: multiplex mono channel buffers into a composite.
///
/// `inputs` is an array of per-channel sample arrays (paired with the
/// config's channels by position); `config` is an `FdmConfig` in its JSON
/// shape. Returns the composite samples.
#[wasm_bindgen]
pub fn multiplex_channels(inputs: JsValue, config: JsValue) -> Result<Vec<f64>, JsValue> {
    let inputs: Vec<Vec<f64>> =
        serde_wasm_bindgen::from_value(inputs).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let config: FdmConfig =
        serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&format!("{e}")))?;

    let raws: Vec<RawAudio> = inputs
        .into_iter()
        .map(|samples| RawAudio::mono(samples, config.sample_rate))
        .collect();
    let result = multiplex(&raws, &config).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(result.composite.signal.samples)
}

/// WASM-exposed: demultiplex a composite back into labeled channels.
///
/// Returns an array of `[label, samples]` pairs in channel order.
#[wasm_bindgen]
pub fn demultiplex_channels(muxed: Vec<f64>, config: JsValue) -> Result<JsValue, JsValue> {
    let config: FdmConfig =
        serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&format!("{e}")))?;

    let muxed = MultiplexedSignal {
        signal: Signal::new(muxed, config.sample_rate),
    };
    let recovered =
        demultiplex(&muxed, &config).map_err(|e| JsValue::from_str(&format!("{e}")))?;

    let pairs: Vec<(String, Vec<f64>)> = recovered
        .into_iter()
        .map(|(label, signal)| (label, signal.samples))
        .collect();
    serde_wasm_bindgen::to_value(&pairs).map_err(|e| JsValue::from_str(&format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, len: usize, fs: f64) -> Vec<f64> {
        (0..len).map(|n| 0.5 * (2.0 * PI * freq * n as f64 / fs).sin()).collect()
    }

    #[test]
    fn session_produces_composite_and_bases() {
        let config = FdmConfig { duration_s: 0.5, ..FdmConfig::default() };
        let len = (config.sample_rate * config.duration_s) as usize;
        let inputs = vec![
            RawAudio::mono(sine(440.0, len, config.sample_rate), config.sample_rate),
            RawAudio::mono(sine(880.0, len, config.sample_rate), config.sample_rate),
            RawAudio::mono(sine(1_320.0, len, config.sample_rate), config.sample_rate),
        ];

        let result = multiplex(&inputs, &config).unwrap();
        assert_eq!(result.composite.len(), len);
        assert_eq!(result.conditioned.len(), 3);
        assert_eq!(result.conditioned[0].0, "A");

        let recovered = demultiplex(&result.composite, &config).unwrap();
        assert_eq!(recovered.len(), 3);
        for (label, signal) in &recovered {
            assert_eq!(signal.len(), len, "channel {label}");
        }
    }

    #[test]
    fn input_count_must_match_channel_count() {
        let config = FdmConfig::default();
        let one = vec![RawAudio::mono(vec![0.5; 100], config.sample_rate)];
        assert_eq!(
            multiplex(&one, &config).unwrap_err(),
            FdmError::ChannelCountMismatch { expected: 3, found: 1 }
        );
    }

    #[test]
    fn invalid_channel_plan_rejected_up_front() {
        let mut config = FdmConfig::default();
        config.channels[1].carrier_hz = 5_000.0;
        let len = 1_000;
        let inputs: Vec<RawAudio> = (0..3)
            .map(|_| RawAudio::mono(vec![0.1; len], config.sample_rate))
            .collect();
        assert!(matches!(
            multiplex(&inputs, &config).unwrap_err(),
            FdmError::CarrierOverlap { .. }
        ));
    }
}
