//! Signal value types — plain sample buffers paired with a sample rate.
//!
//! Every pipeline stage consumes its input by reference and yields a *new*
//! value; no signal is ever mutated in place. All signals participating in
//! one multiplex/demultiplex session share the same sample rate.

/// A mono sequence of real-valued samples at a fixed sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub samples: Vec<f64>,
    pub sample_rate: f64,
}

impl Signal {
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Self {
        Signal { samples, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Maximum absolute sample value.
    pub fn peak(&self) -> f64 {
        peak(&self.samples)
    }

    /// A copy scaled to unit peak amplitude. An all-zero signal is
    /// returned unchanged rather than divided by zero.
    pub fn normalized(&self) -> Signal {
        Signal {
            samples: normalize(&self.samples),
            sample_rate: self.sample_rate,
        }
    }
}

/// Raw, possibly multi-channel audio as delivered by a file collaborator.
/// Input to the conditioner; nothing downstream ever sees more than mono.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAudio {
    /// One sample buffer per channel. Mono input has exactly one.
    pub channels: Vec<Vec<f64>>,
    pub sample_rate: f64,
}

impl RawAudio {
    pub fn mono(samples: Vec<f64>, sample_rate: f64) -> Self {
        RawAudio { channels: vec![samples], sample_rate }
    }

    /// Average all channels into one. Mono input is copied through.
    pub fn downmix(&self) -> Vec<f64> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let len = self.channels.iter().map(Vec::len).max().unwrap_or(0);
        let scale = 1.0 / self.channels.len() as f64;
        let mut mixed = vec![0.0; len];
        for channel in &self.channels {
            for (i, &s) in channel.iter().enumerate() {
                mixed[i] += s * scale;
            }
        }
        mixed
    }
}

/// The unit-normalized sum of all modulated channel signals.
///
/// Transient value handed from the modulator to the demodulator (or to a
/// persistence collaborator); not mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplexedSignal {
    pub signal: Signal,
}

impl MultiplexedSignal {
    pub fn sample_rate(&self) -> f64 {
        self.signal.sample_rate
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }
}

/// Maximum absolute value of a buffer (0.0 when empty).
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |m, &s| m.max(s.abs()))
}

/// Scale a buffer to unit peak amplitude.
///
/// The zero-guard rule: a silent (all-zero) buffer is returned unchanged.
pub fn normalize(samples: &[f64]) -> Vec<f64> {
    let m = peak(samples);
    if m > 0.0 {
        samples.iter().map(|&s| s / m).collect()
    } else {
        samples.to_vec()
    }
}

/// Mean absolute error over the common prefix of two buffers.
///
/// Used to compare a recovered channel against its conditioned original.
pub fn mean_absolute_error(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    a.iter()
        .zip(b.iter())
        .take(n)
        .map(|(&x, &y)| (x - y).abs())
        .sum::<f64>()
        / n as f64
}
