use crate::{Error, LockSnowflakeGenerator, Poll, SnowflakeId, SnowflakeLayout, TimeSource};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{scope, sleep};
use std::time::Duration;

#[derive(Clone)]
struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// A clock that tests can move forwards and backwards.
#[derive(Default)]
struct StepTime {
    millis: AtomicU64,
}

impl StepTime {
    fn at(millis: u64) -> Arc<Self> {
        Arc::new(Self {
            millis: AtomicU64::new(millis),
        })
    }

    fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl TimeSource for StepTime {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// A clock that advances by one millisecond every `reads_per_tick` reads, so
/// spinning callers make progress without real-time waits.
struct TickingTime {
    reads: AtomicUsize,
    reads_per_tick: usize,
    start: u64,
}

impl TimeSource for TickingTime {
    fn current_millis(&self) -> u64 {
        let reads = self.reads.fetch_add(1, Ordering::Relaxed);
        self.start + (reads / self.reads_per_tick) as u64
    }
}

/// Returns 10 on the first read after stalling for `stall`, then 11 forever.
struct StallingTime {
    reads: AtomicUsize,
    stall: Duration,
}

impl TimeSource for StallingTime {
    fn current_millis(&self) -> u64 {
        if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
            sleep(self.stall);
            10
        } else {
            11
        }
    }
}

trait PollExt {
    fn unwrap_ready(self) -> SnowflakeId;
    fn unwrap_pending(self) -> u64;
}

impl PollExt for Poll {
    fn unwrap_ready(self) -> SnowflakeId {
        match self {
            Self::Ready { id } => id,
            Self::Pending { yield_until } => {
                panic!("unexpected pending (yield until: {yield_until})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { yield_until } => yield_until,
        }
    }
}

#[test]
fn sequence_increments_within_same_tick() {
    let generator =
        LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 1, MockTime { millis: 42 }).unwrap();

    let id1 = generator.try_poll_id().unwrap().unwrap_ready();
    let id2 = generator.try_poll_id().unwrap().unwrap_ready();
    let id3 = generator.try_poll_id().unwrap().unwrap_ready();

    for (id, seq) in [(id1, 0), (id2, 1), (id3, 2)] {
        let parts = generator.decompose(id);
        assert_eq!(parts.timestamp, 42);
        assert_eq!(parts.node_id, 1);
        assert_eq!(parts.sequence, seq);
    }
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn same_millisecond_ids_differ_only_in_low_sequence_bits() {
    // epoch 1704067200000, wall clock 1704067200100 => 100ms since epoch
    let generator =
        LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 7, MockTime { millis: 100 }).unwrap();

    let first = generator.next_id().unwrap();
    let second = generator.next_id().unwrap();

    assert_eq!(first.to_raw(), (100 << 22) | (7 << 12));
    assert_eq!(second.to_raw(), (100 << 22) | (7 << 12) | 1);
    assert_eq!(first.to_raw() >> 12, second.to_raw() >> 12);
    assert_ne!(first, second);
}

#[test]
fn returns_pending_when_sequence_exhausted() {
    let layout = SnowflakeLayout::new(51, 10, 2).unwrap();
    let generator = LockSnowflakeGenerator::new(layout, 0, MockTime { millis: 5 }).unwrap();

    for seq in 0..=3 {
        let id = generator.try_poll_id().unwrap().unwrap_ready();
        assert_eq!(generator.decompose(id).sequence, seq);
    }
    assert_eq!(generator.try_poll_id().unwrap().unwrap_pending(), 6);
    // still pending: exhaustion does not mutate state
    assert_eq!(generator.try_poll_id().unwrap().unwrap_pending(), 6);
}

#[test]
fn handles_rollover_to_next_millisecond() {
    let clock = StepTime::at(42);
    let generator =
        LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 1, Arc::clone(&clock)).unwrap();

    for i in 0..=SnowflakeLayout::TWITTER.max_sequence() {
        let id = generator.try_poll_id().unwrap().unwrap_ready();
        let parts = generator.decompose(id);
        assert_eq!(parts.sequence, i);
        assert_eq!(parts.timestamp, 42);
    }

    assert_eq!(generator.try_poll_id().unwrap().unwrap_pending(), 43);

    clock.set(43);

    let id = generator.try_poll_id().unwrap().unwrap_ready();
    let parts = generator.decompose(id);
    assert_eq!(parts.timestamp, 43);
    assert_eq!(parts.sequence, 0);
}

#[test]
fn next_id_spins_until_the_clock_advances() {
    let layout = SnowflakeLayout::new(51, 10, 2).unwrap();
    let clock = TickingTime {
        reads: AtomicUsize::new(0),
        reads_per_tick: 16,
        start: 10,
    };
    let generator = LockSnowflakeGenerator::new(layout, 3, clock).unwrap();

    let ids: Vec<_> = (0..20).map(|_| generator.next_id().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    for id in &ids {
        assert!(generator.decompose(*id).sequence <= 3);
    }
}

#[test]
fn clock_regression_is_fatal() {
    let clock = StepTime::at(1_000);
    let generator =
        LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 1, Arc::clone(&clock)).unwrap();

    let before = generator.next_id().unwrap();

    clock.set(999);
    assert_eq!(
        generator.next_id(),
        Err(Error::ClockRegression {
            now: 999,
            last: 1_000
        })
    );
    assert!(matches!(
        generator.try_poll_id(),
        Err(Error::ClockRegression { .. })
    ));

    // recovers once the clock catches up, without reissuing anything
    clock.set(1_000);
    let after = generator.next_id().unwrap();
    assert!(after > before);
    assert_eq!(generator.decompose(after).sequence, 1);
}

#[tokio::test]
async fn clock_regression_surfaces_from_async_path() {
    let clock = StepTime::at(50);
    let generator =
        LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 1, Arc::clone(&clock)).unwrap();
    generator.next_id_async().await.unwrap();
    clock.set(10);
    assert!(matches!(
        generator.next_id_async().await,
        Err(Error::ClockRegression { now: 10, last: 50 })
    ));
}

#[test]
fn first_id_starts_at_sequence_zero_even_at_time_zero() {
    let generator =
        LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 0, MockTime { millis: 0 }).unwrap();
    let id = generator.next_id().unwrap();
    assert_eq!(id.to_raw(), 0);
}

#[test]
fn rejects_out_of_range_node_id() {
    let result = LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 1024, MockTime { millis: 0 });
    assert!(matches!(
        result,
        Err(Error::NodeIdOutOfRange {
            node_id: 1024,
            max: 1023
        })
    ));
}

#[test]
fn rejects_timestamps_beyond_layout() {
    let layout = SnowflakeLayout::new(8, 43, 12).unwrap();
    let generator = LockSnowflakeGenerator::new(layout, 0, MockTime { millis: 256 }).unwrap();
    assert_eq!(
        generator.next_id(),
        Err(Error::TimestampExhausted { now: 256, max: 255 })
    );
}

#[test]
fn clones_share_state() {
    let generator =
        LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 2, MockTime { millis: 9 }).unwrap();
    let clone = generator.clone();
    let a = generator.next_id().unwrap();
    let b = clone.next_id().unwrap();
    assert_eq!(generator.decompose(b).sequence, 1);
    assert!(a < b);
}

#[test]
fn monotonic_single_threaded() {
    const TOTAL_IDS: usize = 4096 * 64;

    let clock = TickingTime {
        reads: AtomicUsize::new(0),
        reads_per_tick: 1_000,
        start: 1,
    };
    let generator = LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 1, clock).unwrap();

    let mut last_timestamp = 0;
    let mut sequence = 0;
    for _ in 0..TOTAL_IDS {
        let parts = generator.decompose(generator.next_id().unwrap());
        if parts.timestamp > last_timestamp {
            sequence = 0;
        }
        assert!(parts.timestamp >= last_timestamp);
        assert_eq!(parts.node_id, 1);
        assert_eq!(parts.sequence, sequence);
        last_timestamp = parts.timestamp;
        sequence += 1;
    }
}

#[test]
fn unique_and_ordered_across_threads() {
    const THREADS: usize = 8;
    const TOTAL_IDS: usize = 4096 * 64;
    const IDS_PER_THREAD: usize = TOTAL_IDS / THREADS;

    let clock = TickingTime {
        reads: AtomicUsize::new(0),
        reads_per_tick: 512,
        start: 1,
    };
    let generator = LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 5, clock).unwrap();
    let seen_ids = Mutex::new(HashSet::with_capacity(TOTAL_IDS));

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let mut local_last = SnowflakeId::default();
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.next_id().unwrap();
                    // per-thread completion order is also non-decreasing
                    assert!(id > local_last);
                    local_last = id;
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    assert_eq!(seen_ids.lock().unwrap().len(), TOTAL_IDS);
}

#[test]
fn slow_clock_read_does_not_race_a_newer_caller() {
    let clock = Arc::new(StallingTime {
        reads: AtomicUsize::new(0),
        stall: Duration::from_millis(50),
    });
    let generator =
        LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 3, Arc::clone(&clock)).unwrap();

    let (slow, fast) = scope(|s| {
        let slow = s.spawn(|| generator.next_id());
        // wait for the first caller to be inside its clock read
        while clock.reads.load(Ordering::SeqCst) == 0 {
            std::thread::yield_now();
        }
        let fast = s.spawn(|| generator.next_id());
        (slow.join().unwrap(), fast.join().unwrap())
    });

    let slow = slow.unwrap();
    let fast = fast.unwrap();
    assert_eq!(generator.decompose(slow).timestamp, 10);
    assert_eq!(generator.decompose(fast).timestamp, 11);
    assert!(slow < fast);
}

#[test]
fn contended_boundaries_never_report_regression() {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 20_000;

    let clock = TickingTime {
        reads: AtomicUsize::new(0),
        reads_per_tick: 4,
        start: 1,
    };
    let generator = LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 9, clock).unwrap();
    let regressions = AtomicUsize::new(0);

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..IDS_PER_THREAD {
                    if let Err(Error::ClockRegression { .. }) = generator.next_id() {
                        regressions.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert_eq!(regressions.load(Ordering::Relaxed), 0);
}
