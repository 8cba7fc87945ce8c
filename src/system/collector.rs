use std::time::Duration;

use super::metrics::SystemMetrics;
use super::platform;
use super::process::{ProcessSnapshot, SortOrder, sort_by_ram};
use super::sampler::{DEFAULT_SAMPLE_INTERVAL, UtilizationSampler};
use super::snapshot::SystemSnapshot;
use super::source::CounterSource;

/// Owns the metric readers and turns one refresh into a [`SystemSnapshot`].
pub struct Collector {
    source: CounterSource,
    metrics: SystemMetrics,
    sampler: UtilizationSampler,
    ticks_per_second: u64,
    sort_order: SortOrder,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(CounterSource::new())
    }
}

impl Collector {
    pub fn new(source: CounterSource) -> Self {
        Self::with_interval(source, DEFAULT_SAMPLE_INTERVAL)
    }

    pub fn with_interval(source: CounterSource, sample_interval: Duration) -> Self {
        Collector {
            metrics: SystemMetrics::new(source.clone()),
            sampler: UtilizationSampler::with_interval(source.clone(), sample_interval),
            source,
            ticks_per_second: platform::ticks_per_second(),
            sort_order: SortOrder::default(),
        }
    }

    pub fn with_ticks_per_second(mut self, ticks_per_second: u64) -> Self {
        self.ticks_per_second = ticks_per_second;
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn source(&self) -> &CounterSource {
        &self.source
    }

    pub fn metrics(&self) -> &SystemMetrics {
        &self.metrics
    }

    pub fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    pub fn refresh(&mut self) -> SystemSnapshot {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        let cpu_utilization = self.sampler.sample();
        self.build_snapshot(cpu_utilization)
    }

    /// Like [`refresh`](Self::refresh) but awaits the sampler's wait instead
    /// of blocking the runtime thread.
    pub async fn refresh_async(&mut self) -> SystemSnapshot {
        let cpu_utilization = self.sampler.sample_async().await;
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();
        self.build_snapshot(cpu_utilization)
    }

    fn build_snapshot(&self, cpu_utilization: f32) -> SystemSnapshot {
        let _snapshot_span = tracing::debug_span!("collector.build_snapshot").entered();

        let uptime_seconds = self.metrics.up_time_seconds();
        let memory = self.metrics.memory();

        let mut processes: Vec<ProcessSnapshot> = self
            .source
            .process_ids()
            .into_iter()
            .map(|pid| {
                ProcessSnapshot::capture_at(&self.source, pid, self.ticks_per_second, uptime_seconds)
            })
            .collect();
        sort_by_ram(&mut processes, self.sort_order);

        tracing::debug!(
            processes = processes.len(),
            cpu = cpu_utilization,
            "snapshot built"
        );

        SystemSnapshot {
            operating_system: self.metrics.operating_system_name(),
            kernel: self.metrics.kernel_version(),
            cpu_utilization,
            memory,
            memory_utilization: memory.utilization(),
            uptime_seconds,
            total_processes: self.metrics.total_processes(),
            running_processes: self.metrics.running_processes(),
            sort_order: self.sort_order,
            processes,
        }
    }
}
