/// Clock tick rate assumed when the platform cannot report one.
pub const FALLBACK_TICKS_PER_SECOND: u64 = 100;

pub trait PlatformExtensions {
    /// Kernel clock ticks (jiffies) per second, as used by `/proc/*/stat`.
    fn ticks_per_second() -> u64;
}

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod fallback;

#[cfg(not(unix))]
use fallback as platform_impl;
#[cfg(unix)]
use unix as platform_impl;

pub fn ticks_per_second() -> u64 {
    platform_impl::Platform::ticks_per_second()
}
