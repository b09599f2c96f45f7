//! Sleeping that never wakes before its deadline.

use std::time::{Duration, Instant};

/// Clock and sleep primitive used by the pacing loop.
pub trait Sleeper {
    fn now(&self) -> Instant;

    /// Sleeps for about `duration`. May return early.
    fn sleep(&mut self, duration: Duration);
}

/// [`Sleeper`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Sleeps until at least `duration` has passed, resuming after early wakes.
///
/// Returns the time actually slept.
pub fn sleep_at_least<S: Sleeper + ?Sized>(sleeper: &mut S, duration: Duration) -> Duration {
    let start = sleeper.now();
    let deadline = start + duration;
    loop {
        let now = sleeper.now();
        if now >= deadline {
            return now - start;
        }
        sleeper.sleep(deadline - now);
    }
}
