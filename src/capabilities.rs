//! Runtime CPU/accelerator capability detection.
//!
//! Detection happens exactly once: the first caller into [`Capabilities::get`] pays the cost
//! of the feature probes, every subsequent caller reads the cached, read-only result. This is
//! the "runtime-feature probe table" the design calls out as the one process-wide shared
//! state the crate needs, and it is never mutated after first access.

use std::sync::OnceLock;

/// Coarse SIMD tier available for a given lane width, from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimdTier {
    /// No wider-than-scalar ISA extension detected; kernels fall back to auto-vectorization
    /// friendly scalar loops.
    Scalar,
    /// 128-bit SIMD (SSE4.2 / NEON baseline).
    Narrow,
    /// 256-bit SIMD (AVX2 / SVE at 256 bits).
    Wide,
    /// 512-bit SIMD (AVX-512F).
    Widest,
}

/// Process-lifetime record of detected hardware capabilities.
///
/// Constructed once via [`Capabilities::get`]. All fields are plain `Copy` data so the cached
/// value can be returned by value without synchronization after the one-time initialization.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Strongest general-purpose SIMD tier available.
    pub simd_tier: SimdTier,
    /// Whether a 2-D-tile outer-product matrix accelerator (e.g. a scalable matrix extension)
    /// is usable. Always `false` unless built with the `accelerator` feature *and* the
    /// (out-of-scope) runtime probe in [`crate::accel`] confirms the hardware is present.
    pub has_tile_accelerator: bool,
}

static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

impl Capabilities {
    /// Returns the process-wide capability record, computing it on first call.
    pub fn get() -> Capabilities {
        *CAPABILITIES.get_or_init(Self::detect)
    }

    fn detect() -> Capabilities {
        let simd_tier = detect_simd_tier();
        let has_tile_accelerator = detect_tile_accelerator();
        log::debug!(
            "vqmat: detected capabilities simd_tier={simd_tier:?} has_tile_accelerator={has_tile_accelerator}"
        );
        Capabilities {
            simd_tier,
            has_tile_accelerator,
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn detect_simd_tier() -> SimdTier {
    if std::is_x86_feature_detected!("avx512f") {
        SimdTier::Widest
    } else if std::is_x86_feature_detected!("avx2") {
        SimdTier::Wide
    } else if std::is_x86_feature_detected!("sse4.2") {
        SimdTier::Narrow
    } else {
        SimdTier::Scalar
    }
}

#[cfg(target_arch = "aarch64")]
fn detect_simd_tier() -> SimdTier {
    // NEON is part of the aarch64 baseline; treat it as the "Narrow" floor. Wider tiers
    // (SVE/SVE2) require a runtime length query this crate does not perform, so the only
    // tier above NEON we claim is one that a caller has deliberately flagged as selected
    // (see `detect_tile_accelerator`).
    SimdTier::Narrow
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect_simd_tier() -> SimdTier {
    SimdTier::Scalar
}

#[cfg(feature = "accelerator")]
fn detect_tile_accelerator() -> bool {
    crate::accel::platform::probe_tile_accelerator()
}

#[cfg(not(feature = "accelerator"))]
fn detect_tile_accelerator() -> bool {
    false
}
