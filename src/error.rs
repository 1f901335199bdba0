//! The narrow error type for contract violations that are cheap to detect before any memory
//! is touched. See `SPEC_FULL.md` §7: most of this crate is infallible in the CS sense and
//! uses `debug_assert!`/`assert!` for violations that are really caller logic bugs; this enum
//! is reserved for the handful of cases the design explicitly allows to return rather than
//! panic (empty/zero-sized inputs, mismatched buffer lengths, unavailable accelerator).

use thiserror::Error;

/// Errors returned by the matmul and transpose entry points for contract violations that can
/// be detected up front without touching any buffer.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum VqmatError {
    /// One of the input matrices has zero rows or columns.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Declared dimensions don't agree across operands, e.g. `AT` is `k x m` but `B` is not
    /// `k x n`.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(&'static str),

    /// A provided slice is shorter than `rows * leading_dim` requires.
    #[error("buffer too short: {0}")]
    BufferTooShort(&'static str),

    /// `m`/`n` are not multiples of the accelerator's tile extent for this lane type.
    #[error("dimensions not aligned to tile extent: {0}")]
    MisalignedTile(&'static str),

    /// The scoped accelerator guard was requested but the current process/build has no
    /// matrix-accelerator capability; callers should fall back to a SIMD or scalar kernel.
    #[error("accelerator unavailable")]
    AcceleratorUnavailable,
}
