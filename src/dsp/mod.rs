//! DSP core — Pure Rust frequency-division multiplexing chain.
//!
//! Filter design and application, pre-modulation conditioning, AM-DSB-SC
//! modulation onto spaced carriers, and coherent demodulation. Everything
//! operates on plain in-memory sample buffers; file I/O and plotting are
//! external collaborators.

pub mod carrier;
pub mod conditioner;
pub mod demodulator;
pub mod filter;
pub mod modulator;
