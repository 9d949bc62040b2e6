//! WAV persistence collaborator (behind the `wav` feature).
//!
//! The core pipeline never touches storage; these helpers sit at the
//! boundary, converting between WAV files and the plain buffer types the
//! core consumes. A missing or malformed file surfaces here as a `Result`
//! before the pipeline ever runs.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::signal::{RawAudio, Signal};

/// Read a WAV file into raw (possibly multi-channel) audio.
///
/// Integer samples are scaled into [-1.0, 1.0]; float samples pass through.
pub fn read_wav(path: impl AsRef<Path>) -> Result<RawAudio, hound::Error> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_channels = spec.channels as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mut channels = vec![Vec::with_capacity(interleaved.len() / num_channels); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame.iter()) {
            channel.push(sample);
        }
    }

    Ok(RawAudio {
        channels,
        sample_rate: f64::from(spec.sample_rate),
    })
}

/// Write a mono signal as 16-bit PCM, clamping samples to [-1.0, 1.0].
pub fn write_wav(path: impl AsRef<Path>, signal: &Signal) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate as u32,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &signal.samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * f64::from(i16::MAX)) as i16)?;
    }
    writer.finalize()
}
