use serde::Serialize;

use super::source::{
    CounterSource, MEMINFO_FILENAME, STAT_FILENAME, UPTIME_FILENAME, VERSION_FILENAME,
};

/// Memory counters from `/proc/meminfo`, in kB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub total_kb: u64,
    pub free_kb: u64,
}

impl MemoryInfo {
    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.free_kb)
    }

    /// `(total - free) / total`, or 0 when the total is unknown.
    pub fn utilization(&self) -> f32 {
        if self.total_kb == 0 {
            return 0.0;
        }
        (self.used_kb() as f64 / self.total_kb as f64) as f32
    }
}

/// Stateless system-wide reads. Each call re-reads its counter file.
#[derive(Debug, Clone, Default)]
pub struct SystemMetrics {
    source: CounterSource,
}

impl SystemMetrics {
    pub fn new(source: CounterSource) -> Self {
        SystemMetrics { source }
    }

    pub fn source(&self) -> &CounterSource {
        &self.source
    }

    /// `PRETTY_NAME` from the OS identity file, empty when absent.
    pub fn operating_system_name(&self) -> String {
        self.source
            .read_lines(self.source.os_release_path())
            .iter()
            .find_map(|line| os_release_value(line, "PRETTY_NAME"))
            .unwrap_or_default()
    }

    /// Third token of the kernel version banner
    /// (`Linux version 6.8.0-45-generic ...`).
    pub fn kernel_version(&self) -> String {
        self.source
            .read_positional_fields(&self.source.proc_path(VERSION_FILENAME))
            .into_iter()
            .nth(2)
            .unwrap_or_default()
    }

    pub fn memory(&self) -> MemoryInfo {
        let counters = self
            .source
            .read_keyed_counters(&self.source.proc_path(MEMINFO_FILENAME));
        let kb = |key: &str| {
            counters
                .get(key)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0)
        };
        MemoryInfo {
            total_kb: kb("MemTotal"),
            free_kb: kb("MemFree"),
        }
    }

    pub fn memory_utilization(&self) -> f32 {
        self.memory().utilization()
    }

    /// Whole seconds since boot; the fractional part is dropped.
    pub fn up_time_seconds(&self) -> u64 {
        self.source
            .read_positional_fields(&self.source.proc_path(UPTIME_FILENAME))
            .first()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| secs as u64)
            .unwrap_or(0)
    }

    pub fn total_processes(&self) -> u32 {
        self.stat_counter("processes")
    }

    pub fn running_processes(&self) -> u32 {
        self.stat_counter("procs_running")
    }

    fn stat_counter(&self, key: &str) -> u32 {
        self.source
            .read_keyed_counters(&self.source.proc_path(STAT_FILENAME))
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

/// `KEY="some value"` -> `some value` when `KEY` matches.
fn os_release_value(line: &str, wanted: &str) -> Option<String> {
    let (key, value) = line.trim().split_once('=')?;
    if key.trim() != wanted {
        return None;
    }
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_release_value_strips_quotes() {
        assert_eq!(
            os_release_value("PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"", "PRETTY_NAME"),
            Some("Debian GNU/Linux 12 (bookworm)".to_string())
        );
        assert_eq!(
            os_release_value("PRETTY_NAME=Arch", "PRETTY_NAME"),
            Some("Arch".to_string())
        );
        assert_eq!(os_release_value("NAME=\"Debian\"", "PRETTY_NAME"), None);
    }

    #[test]
    fn memory_utilization_guards_zero_total() {
        let info = MemoryInfo {
            total_kb: 0,
            free_kb: 10,
        };
        assert_eq!(info.utilization(), 0.0);
    }

    #[test]
    fn memory_utilization_ratio() {
        let info = MemoryInfo {
            total_kb: 1000,
            free_kb: 250,
        };
        assert_eq!(info.used_kb(), 750);
        assert!((info.utilization() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn free_above_total_saturates() {
        let info = MemoryInfo {
            total_kb: 100,
            free_kb: 400,
        };
        assert_eq!(info.utilization(), 0.0);
    }

    #[test]
    fn unavailable_sources_read_as_zero() {
        let metrics = SystemMetrics::new(CounterSource::with_root("/nonexistent/procmon-root"));
        assert_eq!(metrics.operating_system_name(), "");
        assert_eq!(metrics.kernel_version(), "");
        assert_eq!(metrics.memory_utilization(), 0.0);
        assert_eq!(metrics.up_time_seconds(), 0);
        assert_eq!(metrics.total_processes(), 0);
        assert_eq!(metrics.running_processes(), 0);
    }
}
