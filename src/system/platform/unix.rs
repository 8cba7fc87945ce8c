use super::{FALLBACK_TICKS_PER_SECOND, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn ticks_per_second() -> u64 {
        // sysconf returns -1 when the limit is indeterminate
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if ticks > 0 {
            ticks as u64
        } else {
            FALLBACK_TICKS_PER_SECOND
        }
    }
}
