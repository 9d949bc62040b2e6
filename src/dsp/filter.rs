//! Butterworth IIR filters — cascaded biquad sections via the bilinear
//! transform.
//!
//! Design path: analog prototype poles on the unit circle → pre-warped
//! cutoff → bilinear transform per pole pair → cascade of Direct Form II
//! Transposed sections. A band-pass is realized as a low-pass at the upper
//! edge cascaded with a high-pass at the lower edge.
//!
//! Application is a single forward causal pass. The resulting
//! frequency-dependent group delay is an intentional property of the
//! pipeline and is not compensated anywhere downstream.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::FilterSpecError;

/// Which response a [`FilterSpec`] describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    Lowpass { cutoff_hz: f64 },
    Bandpass { low_hz: f64, high_hz: f64 },
}

/// A validated-on-design description of a Butterworth filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub order: usize,
    pub sample_rate: f64,
}

impl FilterSpec {
    pub fn lowpass(cutoff_hz: f64, order: usize, sample_rate: f64) -> Self {
        FilterSpec {
            kind: FilterKind::Lowpass { cutoff_hz },
            order,
            sample_rate,
        }
    }

    pub fn bandpass(low_hz: f64, high_hz: f64, order: usize, sample_rate: f64) -> Self {
        FilterSpec {
            kind: FilterKind::Bandpass { low_hz, high_hz },
            order,
            sample_rate,
        }
    }

    /// Nyquist frequency for this spec's sample rate.
    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Validate the spec and compute filter sections.
    ///
    /// A band-pass upper edge at or above Nyquist is silently clamped to
    /// Nyquist − 1 Hz before design; every other violation is an error.
    pub fn design(&self) -> Result<ButterworthFilter, FilterSpecError> {
        if self.sample_rate <= 0.0 {
            return Err(FilterSpecError::NonPositiveSampleRate {
                sample_rate_hz: self.sample_rate,
            });
        }
        if self.order < 1 {
            return Err(FilterSpecError::OrderTooLow { order: self.order });
        }
        let nyquist = self.nyquist_hz();

        let sections = match self.kind {
            FilterKind::Lowpass { cutoff_hz } => {
                if cutoff_hz <= 0.0 {
                    return Err(FilterSpecError::NonPositiveCutoff { cutoff_hz });
                }
                if cutoff_hz >= nyquist {
                    return Err(FilterSpecError::CutoffAboveNyquist {
                        cutoff_hz,
                        nyquist_hz: nyquist,
                    });
                }
                lowpass_sections(self.order, cutoff_hz, self.sample_rate)
            }
            FilterKind::Bandpass { low_hz, high_hz } => {
                let high_hz = if high_hz >= nyquist { nyquist - 1.0 } else { high_hz };
                if low_hz <= 0.0 {
                    return Err(FilterSpecError::NonPositiveCutoff { cutoff_hz: low_hz });
                }
                if low_hz >= high_hz {
                    return Err(FilterSpecError::InvertedBand { low_hz, high_hz });
                }
                let mut sections = lowpass_sections(self.order, high_hz, self.sample_rate);
                sections.extend(highpass_sections(self.order, low_hz, self.sample_rate));
                sections
            }
        };

        Ok(ButterworthFilter {
            sections,
            sample_rate: self.sample_rate,
        })
    }
}

/// One second-order (or degenerate first-order) section.
///
/// Transfer function: H(z) = (b0 + b1·z⁻¹ + b2·z⁻²) / (1 + a1·z⁻¹ + a2·z⁻²),
/// processed in Direct Form II Transposed.
#[derive(Debug, Clone, PartialEq)]
pub struct Biquad {
    b: [f64; 3],
    a: [f64; 2],
    z: [f64; 2],
}

impl Biquad {
    fn new(b: [f64; 3], a: [f64; 2]) -> Self {
        Biquad { b, a, z: [0.0; 2] }
    }

    fn process(&mut self, input: f64) -> f64 {
        let output = self.b[0] * input + self.z[0];
        self.z[0] = self.b[1] * input - self.a[0] * output + self.z[1];
        self.z[1] = self.b[2] * input - self.a[1] * output;
        output
    }

    /// Poles inside the unit circle.
    fn is_stable(&self) -> bool {
        self.a[1].abs() < 1.0 && self.a[0].abs() < 1.0 + self.a[1]
    }

    /// Response at z = e^{jω}.
    fn response_at(&self, z_inv: Complex64) -> Complex64 {
        let z_inv2 = z_inv * z_inv;
        let num = self.b[0] + self.b[1] * z_inv + self.b[2] * z_inv2;
        let den = 1.0 + self.a[0] * z_inv + self.a[1] * z_inv2;
        num / den
    }
}

/// A designed Butterworth filter, ready to apply to sample buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct ButterworthFilter {
    sections: Vec<Biquad>,
    sample_rate: f64,
}

impl ButterworthFilter {
    /// Run the filter over a buffer in one forward causal pass, starting
    /// from zero state. Yields a new buffer of the same length.
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let mut sections = self.sections.clone();
        input
            .iter()
            .map(|&sample| {
                sections
                    .iter_mut()
                    .fold(sample, |acc, section| section.process(acc))
            })
            .collect()
    }

    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// All sections have poles inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(Biquad::is_stable)
    }

    /// Complex frequency response H(e^{jω}) at a frequency in Hz.
    pub fn frequency_response(&self, freq_hz: f64) -> Complex64 {
        let omega = 2.0 * PI * freq_hz / self.sample_rate;
        let z_inv = Complex64::new(omega.cos(), -omega.sin());
        self.sections
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, s| acc * s.response_at(z_inv))
    }

    /// Magnitude response at a frequency in Hz.
    pub fn magnitude_at(&self, freq_hz: f64) -> f64 {
        self.frequency_response(freq_hz).norm()
    }
}

/// Pre-warp an analog cutoff for the bilinear transform.
fn prewarp(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * sample_rate * (PI * freq_hz / sample_rate).tan()
}

/// Butterworth prototype poles in the upper half of the s-plane, one per
/// conjugate pair. For order N the pair angles are θ_k = π(2k + N + 1)/(2N),
/// k < N/2; an odd order's extra real pole at −1 is handled by the callers.
fn prototype_pairs(order: usize) -> Vec<Complex64> {
    (0..order / 2)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::new(theta.cos(), theta.sin())
        })
        .collect()
}

fn lowpass_sections(order: usize, cutoff_hz: f64, sample_rate: f64) -> Vec<Biquad> {
    let wc = prewarp(cutoff_hz, sample_rate);
    let k = 2.0 * sample_rate;
    let k2 = k * k;
    let wc2 = wc * wc;

    let mut sections: Vec<Biquad> = prototype_pairs(order)
        .iter()
        .map(|p| {
            // Analog pair section: H(s) = wc² / (s² − 2σs + wc²), σ = wc·Re(p)
            let sigma = wc * p.re;
            let d = k2 - 2.0 * k * sigma + wc2;
            Biquad::new(
                [wc2 / d, 2.0 * wc2 / d, wc2 / d],
                [2.0 * (wc2 - k2) / d, (k2 + 2.0 * k * sigma + wc2) / d],
            )
        })
        .collect();

    if order % 2 == 1 {
        // Real pole at −wc: H(s) = wc / (s + wc)
        let d = k + wc;
        sections.push(Biquad::new([wc / d, wc / d, 0.0], [(wc - k) / d, 0.0]));
    }
    sections
}

fn highpass_sections(order: usize, cutoff_hz: f64, sample_rate: f64) -> Vec<Biquad> {
    let wc = prewarp(cutoff_hz, sample_rate);
    let k = 2.0 * sample_rate;
    let k2 = k * k;
    let wc2 = wc * wc;

    let mut sections: Vec<Biquad> = prototype_pairs(order)
        .iter()
        .map(|p| {
            // Analog pair section: H(s) = s² / (s² − 2σs + wc²)
            let sigma = wc * p.re;
            let d = k2 - 2.0 * k * sigma + wc2;
            Biquad::new(
                [k2 / d, -2.0 * k2 / d, k2 / d],
                [2.0 * (wc2 - k2) / d, (k2 + 2.0 * k * sigma + wc2) / d],
            )
        })
        .collect();

    if order % 2 == 1 {
        // Real pole at −wc: H(s) = s / (s + wc)
        let d = k + wc;
        sections.push(Biquad::new([k / d, -k / d, 0.0], [(wc - k) / d, 0.0]));
    }
    sections
}
