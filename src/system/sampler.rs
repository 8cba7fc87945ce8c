use std::time::{Duration, Instant};

use serde::Serialize;

use super::source::{CounterSource, STAT_FILENAME};

/// Minimum separation between the two readings of a utilization pass.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Cumulative CPU tick counters from the aggregate `cpu` line of
/// `/proc/stat`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuSample {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuSample {
    pub const FIELD_COUNT: usize = 10;

    /// Parses the counters following the leading `cpu` token. Older kernels
    /// omit the trailing columns; those read as 0. Fewer than the first four
    /// columns, or any non-numeric column, is a malformed line.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        let (label, counters) = fields.split_first()?;
        if !label.as_ref().starts_with("cpu") || counters.len() < 4 {
            return None;
        }

        let mut values = [0u64; Self::FIELD_COUNT];
        for (slot, raw) in values.iter_mut().zip(counters) {
            *slot = raw.as_ref().parse().ok()?;
        }
        let [user, nice, system, idle, iowait, irq, softirq, steal, guest, guest_nice] = values;
        Some(CpuSample {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        })
    }

    pub fn read(source: &CounterSource) -> Option<Self> {
        Self::from_fields(&source.read_positional_fields(&source.proc_path(STAT_FILENAME)))
    }

    /// idle + iowait
    pub fn idle_jiffies(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// Sum of all ten counters.
    pub fn total_jiffies(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    pub fn active_jiffies(&self) -> u64 {
        self.total_jiffies().saturating_sub(self.idle_jiffies())
    }
}

/// Busy fraction of the interval between two chronologically ordered
/// samples, in `[0, 1]`.
///
/// Returns 0 when no ticks elapsed or the counters went backwards (reboot or
/// wraparound).
pub fn utilization_between(previous: &CpuSample, current: &CpuSample) -> f32 {
    let Some(total_delta) = current.total_jiffies().checked_sub(previous.total_jiffies()) else {
        return 0.0;
    };
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = current
        .idle_jiffies()
        .saturating_sub(previous.idle_jiffies())
        .min(total_delta);
    let busy = (total_delta - idle_delta) as f64 / total_delta as f64;
    (busy as f32).clamp(0.0, 1.0)
}

/// Aggregate CPU utilization from two time-separated `/proc/stat` readings.
///
/// The kernel only exposes cumulative counters, so each call differences the
/// current reading against the one held from the previous call. The first
/// call takes its own baseline. If less than `interval` has passed since the
/// held reading, the call blocks for the remainder so both readings are
/// strictly ordered and a non-zero time apart.
///
/// A sampler must have a single owner; `sample` mutates the held reading.
#[derive(Debug)]
pub struct UtilizationSampler {
    source: CounterSource,
    interval: Duration,
    previous: Option<(CpuSample, Instant)>,
}

impl UtilizationSampler {
    pub fn new(source: CounterSource) -> Self {
        Self::with_interval(source, DEFAULT_SAMPLE_INTERVAL)
    }

    pub fn with_interval(source: CounterSource, interval: Duration) -> Self {
        UtilizationSampler {
            source,
            interval,
            previous: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_ready(&self) -> bool {
        self.previous.is_some()
    }

    /// Most recent reading, if any.
    pub fn last_sample(&self) -> Option<CpuSample> {
        self.previous.map(|(sample, _)| sample)
    }

    pub fn sample(&mut self) -> f32 {
        let Some(wait) = self.prepare() else {
            return 0.0;
        };
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        self.complete()
    }

    /// Same contract as [`sample`](Self::sample), waiting on a tokio timer
    /// instead of blocking the thread.
    pub async fn sample_async(&mut self) -> f32 {
        let Some(wait) = self.prepare() else {
            return 0.0;
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        self.complete()
    }

    /// Takes the baseline if none is held and returns how long to wait before
    /// the second reading. `None` when the baseline read failed.
    fn prepare(&mut self) -> Option<Duration> {
        if self.previous.is_none() {
            let baseline = CpuSample::read(&self.source)?;
            self.previous = Some((baseline, Instant::now()));
        }
        let (_, taken_at) = self.previous?;
        Some(self.interval.saturating_sub(taken_at.elapsed()))
    }

    fn complete(&mut self) -> f32 {
        let Some(current) = CpuSample::read(&self.source) else {
            tracing::debug!("cpu counters unavailable, keeping previous sample");
            return 0.0;
        };
        let utilization = match self.previous {
            Some((previous, _)) => utilization_between(&previous, &current),
            None => 0.0,
        };
        self.previous = Some((current, Instant::now()));
        utilization
    }
}
