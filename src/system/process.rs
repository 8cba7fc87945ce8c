use std::cmp::Ordering;

use serde::Serialize;

use super::metrics::SystemMetrics;
use super::source::{CMDLINE_FILENAME, CounterSource, STAT_FILENAME, STATUS_FILENAME};

/// `/proc/<pid>/stat` indices (0-based, kernel order).
const UTIME_FIELD: usize = 13;
const CSTIME_FIELD: usize = 16;
const STARTTIME_FIELD: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "RAM asc",
            SortOrder::Descending => "RAM desc",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }
}

/// Point-in-time metrics for one process. Built once per refresh and never
/// updated; the next refresh builds a new one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessSnapshot {
    pid: u32,
    command: String,
    ram_kb: u64,
    user: String,
    uptime_seconds: u64,
    cpu_utilization: f32,
}

impl ProcessSnapshot {
    /// Reads `cmdline`, `status` and `stat` for `pid` plus the system uptime.
    /// Unreadable pieces fall back to empty or zero; a process that vanished
    /// mid-read still yields a snapshot.
    pub fn capture(source: &CounterSource, pid: u32, ticks_per_second: u64) -> Self {
        let system_uptime = SystemMetrics::new(source.clone()).up_time_seconds();
        Self::capture_at(source, pid, ticks_per_second, system_uptime)
    }

    /// Like [`capture`](Self::capture) with the system uptime already known,
    /// so one refresh reads `/proc/uptime` once.
    pub fn capture_at(
        source: &CounterSource,
        pid: u32,
        ticks_per_second: u64,
        system_uptime_seconds: u64,
    ) -> Self {
        let command = source.read_single_value(&source.pid_path(pid, CMDLINE_FILENAME));

        let status = source.read_keyed_counters(&source.pid_path(pid, STATUS_FILENAME));
        let ram_kb = status
            .get("VmSize")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let user = status
            .get("Uid")
            .map(|uid| source.user_name(uid))
            .unwrap_or_default();

        let stat = source.read_positional_fields(&source.pid_path(pid, STAT_FILENAME));
        let uptime_seconds = process_uptime(&stat, system_uptime_seconds, ticks_per_second);
        let cpu_utilization = cpu_utilization(active_jiffies(&stat), ticks_per_second, uptime_seconds);

        ProcessSnapshot {
            pid,
            command,
            ram_kb,
            user,
            uptime_seconds,
            cpu_utilization,
        }
    }

    pub fn new(
        pid: u32,
        command: impl Into<String>,
        ram_kb: u64,
        user: impl Into<String>,
        uptime_seconds: u64,
        cpu_utilization: f32,
    ) -> Self {
        ProcessSnapshot {
            pid,
            command: command.into(),
            ram_kb,
            user: user.into(),
            uptime_seconds,
            cpu_utilization,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Virtual memory size (`VmSize`) in kB.
    pub fn ram_kb(&self) -> u64 {
        self.ram_kb
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.uptime_seconds
    }

    /// Lifetime-average CPU share. Can exceed 1.0 briefly for young
    /// processes or multi-threaded work; it is not clamped here.
    pub fn cpu_utilization(&self) -> f32 {
        self.cpu_utilization
    }
}

/// utime + stime + cutime + cstime of a split `/proc/<pid>/stat` line.
/// Missing or unparsable fields count as 0.
pub fn active_jiffies<S: AsRef<str>>(stat: &[S]) -> u64 {
    stat.iter()
        .skip(UTIME_FIELD)
        .take(CSTIME_FIELD - UTIME_FIELD + 1)
        .filter_map(|field| field.as_ref().parse::<i64>().ok())
        .map(|ticks| ticks.max(0) as u64)
        .fold(0u64, u64::saturating_add)
}

/// Active jiffies for `pid`, read from its stat file.
pub fn active_jiffies_for(source: &CounterSource, pid: u32) -> u64 {
    active_jiffies(&source.read_positional_fields(&source.pid_path(pid, STAT_FILENAME)))
}

/// Seconds since the process started: system uptime minus the start time
/// (field 21, in ticks since boot). 0 when the start time is unreadable.
pub fn process_uptime<S: AsRef<str>>(
    stat: &[S],
    system_uptime_seconds: u64,
    ticks_per_second: u64,
) -> u64 {
    if ticks_per_second == 0 {
        return 0;
    }
    let Some(start_ticks) = stat
        .get(STARTTIME_FIELD)
        .and_then(|field| field.as_ref().parse::<u64>().ok())
    else {
        return 0;
    };
    system_uptime_seconds.saturating_sub(start_ticks / ticks_per_second)
}

/// `(active_jiffies / ticks_per_second) / uptime_seconds`, 0 for a process
/// with no measurable uptime.
pub fn cpu_utilization(active_jiffies: u64, ticks_per_second: u64, uptime_seconds: u64) -> f32 {
    if uptime_seconds == 0 || ticks_per_second == 0 {
        return 0.0;
    }
    let cpu_seconds = active_jiffies as f64 / ticks_per_second as f64;
    (cpu_seconds / uptime_seconds as f64) as f32
}

/// Orders snapshots by `ram_kb` only.
pub fn cmp_by_ram(a: &ProcessSnapshot, b: &ProcessSnapshot) -> Ordering {
    a.ram_kb.cmp(&b.ram_kb)
}

/// Stable sort by RAM: equal-RAM snapshots keep their input order in both
/// directions.
pub fn sort_by_ram(processes: &mut [ProcessSnapshot], order: SortOrder) {
    match order {
        SortOrder::Ascending => processes.sort_by(cmp_by_ram),
        SortOrder::Descending => processes.sort_by(|a, b| cmp_by_ram(b, a)),
    }
}
