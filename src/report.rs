use std::fmt::Write;

use crate::format::{format_elapsed, format_kb, format_percent, kb_to_mb, truncate_unicode};
use crate::system::snapshot::SystemSnapshot;

const COMMAND_WIDTH: usize = 60;

/// Plain-text rendering of one snapshot, for `--once`.
pub fn render_text(snapshot: &SystemSnapshot, max_processes: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "OS:        {}", snapshot.operating_system);
    let _ = writeln!(out, "Kernel:    {}", snapshot.kernel);
    let _ = writeln!(out, "CPU:       {}", format_percent(snapshot.cpu_utilization));
    let _ = writeln!(
        out,
        "Memory:    {} ({} / {})",
        format_percent(snapshot.memory_utilization),
        format_kb(snapshot.memory.used_kb()),
        format_kb(snapshot.memory.total_kb)
    );
    let _ = writeln!(
        out,
        "Processes: {} total, {} running",
        snapshot.total_processes, snapshot.running_processes
    );
    let _ = writeln!(out, "Up Time:   {}", format_elapsed(snapshot.uptime_seconds));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>7} {:<10} {:>6} {:>8} {:>9} COMMAND ({})",
        "PID",
        "USER",
        "CPU%",
        "RAM[MB]",
        "TIME+",
        snapshot.sort_order.label()
    );
    for process in snapshot.processes.iter().take(max_processes) {
        let _ = writeln!(
            out,
            "{:>7} {:<10} {:>6} {:>8} {:>9} {}",
            process.pid(),
            truncate_unicode(process.user(), 10),
            format_percent(process.cpu_utilization()),
            kb_to_mb(process.ram_kb()),
            format_elapsed(process.uptime_seconds()),
            truncate_unicode(process.command(), COMMAND_WIDTH)
        );
    }
    out
}

pub fn render_json(snapshot: &SystemSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}
