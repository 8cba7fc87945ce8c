mod common;

use std::time::{Duration, Instant};

use common::FakeSystem;
use procmon::system::sampler::{CpuSample, UtilizationSampler, utilization_between};
use proptest::prelude::*;

const S1: &str = "cpu  100 10 30 500 5 1 1 0 0 0";
const S2: &str = "cpu  150 10 30 520 5 1 1 0 0 0";

fn sampler(fake: &FakeSystem, interval_ms: u64) -> UtilizationSampler {
    UtilizationSampler::with_interval(fake.source(), Duration::from_millis(interval_ms))
}

#[test]
fn first_sample_takes_its_own_baseline() {
    let fake = FakeSystem::new();
    fake.stat(S1, 1, 1);
    let mut sampler = sampler(&fake, 5);
    assert!(!sampler.is_ready());

    // counters did not move during the internal wait
    assert_eq!(sampler.sample(), 0.0);
    assert!(sampler.is_ready());
}

#[test]
fn second_sample_differences_against_held_reading() {
    let fake = FakeSystem::new();
    fake.stat(S1, 1, 1);
    let mut sampler = sampler(&fake, 5);
    sampler.sample();

    fake.stat(S2, 1, 1);
    let u = sampler.sample();
    // totalDelta = 70, idleDelta = 20
    assert!((u - 50.0 / 70.0).abs() < 1e-6);

    let held = sampler.last_sample().unwrap();
    assert_eq!(held.user, 150);
    assert_eq!(held.idle, 520);
}

#[test]
fn unchanged_counters_after_ready_give_zero() {
    let fake = FakeSystem::new();
    fake.stat(S2, 1, 1);
    let mut sampler = sampler(&fake, 1);
    sampler.sample();
    assert_eq!(sampler.sample(), 0.0);
}

#[test]
fn readings_are_separated_by_the_interval() {
    let fake = FakeSystem::new();
    fake.stat(S1, 1, 1);
    let mut sampler = sampler(&fake, 30);

    let started = Instant::now();
    sampler.sample();
    assert!(started.elapsed() >= Duration::from_millis(30));

    let again = Instant::now();
    sampler.sample();
    assert!(again.elapsed() >= Duration::from_millis(25));
}

#[test]
fn wait_is_skipped_once_interval_elapsed() {
    let fake = FakeSystem::new();
    fake.stat(S1, 1, 1);
    let mut sampler = sampler(&fake, 20);
    sampler.sample();
    std::thread::sleep(Duration::from_millis(40));

    let started = Instant::now();
    sampler.sample();
    assert!(started.elapsed() < Duration::from_millis(20));
}

#[test]
fn counter_reset_returns_zero_and_rebases() {
    let fake = FakeSystem::new();
    fake.stat(S2, 1, 1);
    let mut sampler = sampler(&fake, 1);
    sampler.sample();

    fake.stat(S1, 1, 1);
    assert_eq!(sampler.sample(), 0.0);
    assert_eq!(sampler.last_sample().unwrap().user, 100);

    fake.stat(S2, 1, 1);
    assert!((sampler.sample() - 50.0 / 70.0).abs() < 1e-6);
}

#[test]
fn failed_read_keeps_previous_sample() {
    let fake = FakeSystem::new();
    fake.stat(S1, 1, 1);
    let mut sampler = sampler(&fake, 1);
    sampler.sample();

    fake.write("proc/stat", "garbage\n");
    assert_eq!(sampler.sample(), 0.0);
    assert_eq!(sampler.last_sample().unwrap().user, 100);

    fake.stat(S2, 1, 1);
    assert!((sampler.sample() - 50.0 / 70.0).abs() < 1e-6);
}

#[tokio::test(flavor = "current_thread")]
async fn async_sample_has_the_same_contract() {
    let fake = FakeSystem::new();
    fake.stat(S1, 1, 1);
    let mut sampler = sampler(&fake, 5);
    assert_eq!(sampler.sample_async().await, 0.0);

    fake.stat(S2, 1, 1);
    let u = sampler.sample_async().await;
    assert!((u - 50.0 / 70.0).abs() < 1e-6);
}

fn cpu(values: [u64; 10]) -> CpuSample {
    let [user, nice, system, idle, iowait, irq, softirq, steal, guest, guest_nice] = values;
    CpuSample {
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
    }
}

proptest! {
    #[test]
    fn increasing_counters_stay_in_unit_range(
        base in proptest::array::uniform10(0u64..1_000_000_000),
        step in proptest::array::uniform10(0u64..1_000_000),
    ) {
        let first = cpu(base);
        let mut next = base;
        for (slot, inc) in next.iter_mut().zip(step) {
            *slot += inc;
        }
        let u = utilization_between(&first, &cpu(next));
        prop_assert!((0.0..=1.0).contains(&u));
    }

    #[test]
    fn any_pair_never_leaves_unit_range(
        a in proptest::array::uniform10(any::<u64>()),
        b in proptest::array::uniform10(any::<u64>()),
    ) {
        let u = utilization_between(&cpu(a), &cpu(b));
        prop_assert!((0.0..=1.0).contains(&u));
    }
}
