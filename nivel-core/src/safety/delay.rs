//! Bounded safe delay
//!
//! A long wait anywhere in the firmware must not starve thermal protection.
//! `safe_delay` splits the wait into slices of at most [`SLICE_MS`] and
//! services the safety routine after every slice, plus once more after the
//! final remainder so that many short delays in a row still service it.
//!
//! The blocking variant occupies the caller for the whole duration and must
//! never be called from interrupt context.

use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

/// Longest wait between two safety routine invocations (ms)
pub const SLICE_MS: u32 = 50;

/// Periodic safety routine serviced during waits
///
/// Any `FnMut()` closure is a routine; drivers provide concrete ones such
/// as a thermal guard.
pub trait SafetyRoutine {
    /// Run one iteration of the routine
    fn service(&mut self);
}

impl<F: FnMut()> SafetyRoutine for F {
    fn service(&mut self) {
        self()
    }
}

/// Block for `ms` milliseconds, servicing `routine` at least every [`SLICE_MS`]
///
/// The routine runs once after each full slice and once after the trailing
/// remainder, so it runs at least once even for `ms == 0`.
pub fn safe_delay<D, R>(delay: &mut D, mut ms: u32, routine: &mut R)
where
    D: DelayNs + ?Sized,
    R: SafetyRoutine + ?Sized,
{
    while ms > SLICE_MS {
        ms -= SLICE_MS;
        delay.delay_ms(SLICE_MS);
        routine.service();
    }
    delay.delay_ms(ms);
    routine.service();
}

/// Async twin of [`safe_delay`] for executor-based firmware
///
/// Yields to the executor during each slice instead of spinning. Slicing and
/// servicing follow exactly the same pattern as the blocking version.
pub async fn safe_delay_async<D, R>(delay: &mut D, mut ms: u32, routine: &mut R)
where
    D: AsyncDelayNs + ?Sized,
    R: SafetyRoutine + ?Sized,
{
    while ms > SLICE_MS {
        ms -= SLICE_MS;
        delay.delay_ms(SLICE_MS).await;
        routine.service();
    }
    delay.delay_ms(ms).await;
    routine.service();
}
