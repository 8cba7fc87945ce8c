use serde::Serialize;

use super::metrics::MemoryInfo;
use super::process::{ProcessSnapshot, SortOrder};

/// Everything one refresh derived, ready for display.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SystemSnapshot {
    pub operating_system: String,
    pub kernel: String,
    pub cpu_utilization: f32,
    pub memory: MemoryInfo,
    pub memory_utilization: f32,
    pub uptime_seconds: u64,
    pub total_processes: u32,
    pub running_processes: u32,
    pub sort_order: SortOrder,
    pub processes: Vec<ProcessSnapshot>,
}
