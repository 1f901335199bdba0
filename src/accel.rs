//! The scoped accelerator guard.
//!
//! The 2-D-tile matmul and accelerator-tile transpose kernels require, for the duration of a
//! single call, that (a) the calling thread cannot migrate across hardware execution contexts
//! and (b) the signal that would otherwise preempt it mid-kernel is blocked — the hardware
//! saves/restores ordinary SIMD registers across a preemption but not the 2-D accumulator
//! tile, so an untimely preemption is silent data corruption, not a crash.
//!
//! The actual `sched_setaffinity`/`pthread_setaffinity_np`-equivalent and
//! `pthread_sigmask`-equivalent calls are out of scope for this crate (per `spec.md` §1) and
//! are represented by the narrow [`AcceleratorPlatform`] seam below. What *is* in scope, and
//! what this module exists to get right, is the RAII protocol: acquire once on entry, release
//! on every exit path, including an unwinding panic.

use crate::error::VqmatError;

/// A platform seam for the two primitive operations the guard needs. Out of scope per
/// `spec.md` §1; the default implementation used when the `accelerator` feature is disabled
/// is a pure no-op so the guard's lifecycle is exercised uniformly in tests without requiring
/// real accelerator hardware.
pub trait AcceleratorPlatform {
    /// Bind the current thread to a single execution context. Returns an opaque token that
    /// [`Self::unbind`] uses to restore the prior affinity.
    ///
    /// # Safety
    /// Implementations call into OS thread-affinity primitives; callers must pair every
    /// successful `bind` with exactly one `unbind`.
    unsafe fn bind(&self) -> usize;

    /// Undo [`Self::bind`], restoring the affinity token it returned.
    ///
    /// # Safety
    /// `token` must be the value a matching `bind` call returned, and must not have already
    /// been passed to `unbind`.
    unsafe fn unbind(&self, token: usize);

    /// Block the asynchronous preemption signal for the current thread. Returns an opaque
    /// token describing the prior signal mask.
    ///
    /// # Safety
    /// Callers must pair every successful `mask_signal` with exactly one `unmask_signal`.
    unsafe fn mask_signal(&self) -> usize;

    /// Undo [`Self::mask_signal`].
    ///
    /// # Safety
    /// `token` must be the value a matching `mask_signal` call returned, and must not have
    /// already been passed to `unmask_signal`.
    unsafe fn unmask_signal(&self, token: usize);
}

/// The no-op platform used whenever the `accelerator` feature is disabled, or the runtime
/// capability probe found no usable hardware. Exercises the guard's acquire/release protocol
/// without requiring accelerator hardware to be present.
struct NullPlatform;

impl AcceleratorPlatform for NullPlatform {
    unsafe fn bind(&self) -> usize {
        0
    }
    unsafe fn unbind(&self, _token: usize) {}
    unsafe fn mask_signal(&self) -> usize {
        0
    }
    unsafe fn unmask_signal(&self, _token: usize) {}
}

/// A scoped, per-thread binding to a single hardware execution context with asynchronous
/// preemption suppressed. Acquire with [`AcceleratorGuard::acquire`]; the binding and the
/// signal mask are both restored when the guard is dropped, including when dropped during
/// unwinding.
pub struct AcceleratorGuard<'a> {
    platform: &'a dyn AcceleratorPlatform,
    affinity_token: usize,
    signal_token: usize,
}

impl<'a> AcceleratorGuard<'a> {
    /// Acquires the guard using the default platform seam (a no-op unless built with the
    /// `accelerator` feature and the capability probe confirms hardware support).
    ///
    /// Returns [`VqmatError::AcceleratorUnavailable`] when [`crate::capabilities::Capabilities`]
    /// reports no tile accelerator; callers should treat that as a routing signal and fall
    /// back to the SIMD or scalar kernel rather than as a fatal error.
    pub fn acquire() -> Result<AcceleratorGuard<'static>, VqmatError> {
        if !crate::capabilities::Capabilities::get().has_tile_accelerator {
            return Err(VqmatError::AcceleratorUnavailable);
        }
        static PLATFORM: NullPlatform = NullPlatform;
        Self::acquire_with(&PLATFORM)
    }

    /// Acquires the guard against an explicit platform seam. Exposed for tests that want to
    /// observe the acquire/release protocol without depending on [`crate::capabilities`].
    pub fn acquire_with(
        platform: &'a dyn AcceleratorPlatform,
    ) -> Result<AcceleratorGuard<'a>, VqmatError> {
        // SAFETY: `affinity_token`/`signal_token` are consumed by exactly one matching
        // `unbind`/`unmask_signal` call, performed in `Drop::drop` below.
        let affinity_token = unsafe { platform.bind() };
        let signal_token = unsafe { platform.mask_signal() };
        Ok(AcceleratorGuard {
            platform,
            affinity_token,
            signal_token,
        })
    }
}

impl Drop for AcceleratorGuard<'_> {
    fn drop(&mut self) {
        // SAFETY: these tokens came from the `bind`/`mask_signal` calls in `acquire_with`,
        // and `drop` runs at most once, so each token is consumed exactly once, including on
        // an unwinding panic.
        unsafe {
            self.platform.unmask_signal(self.signal_token);
            self.platform.unbind(self.affinity_token);
        }
    }
}

/// The real platform seam, gated behind the `accelerator` feature. Deliberately left as a
/// narrow stub: the actual syscalls are out of scope (`spec.md` §1), but the capability probe
/// in [`crate::capabilities`] needs something to call when the feature is enabled.
#[cfg(feature = "accelerator")]
pub mod platform {
    /// Probes for a usable 2-D-tile matrix accelerator. Stubbed to `false`: a real build would
    /// consult the OS/hwcap mechanism appropriate to the target.
    pub fn probe_tile_accelerator() -> bool {
        false
    }
}
