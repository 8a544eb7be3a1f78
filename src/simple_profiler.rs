//! Simple profiling counters using thread-local storage
//!
//! Lightweight instrumentation that does not change function signatures.
//! Enable with environment variable: RIDER_PROFILE=1

use std::cell::RefCell;
use std::sync::OnceLock;
use std::time::Instant;

use log::info;

/// Accumulated timings (nanoseconds) and call counts for one thread
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub flood_fill_time_ns: u64,
    pub flood_fill_count: usize,
    pub apply_move_time_ns: u64,
    pub apply_move_count: usize,
    pub search_time_ns: u64,
    pub search_count: usize,
    pub beta_cutoffs: usize,
}

thread_local! {
    static COUNTERS: RefCell<ProfileSnapshot> = RefCell::new(ProfileSnapshot::default());
}

static ENABLED: OnceLock<bool> = OnceLock::new();

#[inline]
pub fn is_profiling_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("RIDER_PROFILE").is_ok())
}

pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;

        COUNTERS.with(|c| {
            let mut c = c.borrow_mut();
            match self.category {
                "flood_fill" => {
                    c.flood_fill_time_ns += elapsed_ns;
                    c.flood_fill_count += 1;
                }
                "apply_move" => {
                    c.apply_move_time_ns += elapsed_ns;
                    c.apply_move_count += 1;
                }
                "search" => {
                    c.search_time_ns += elapsed_ns;
                    c.search_count += 1;
                }
                _ => {}
            }
        });
    }
}

#[inline]
pub fn record_beta_cutoff() {
    if is_profiling_enabled() {
        COUNTERS.with(|c| c.borrow_mut().beta_cutoffs += 1);
    }
}

pub fn snapshot() -> ProfileSnapshot {
    COUNTERS.with(|c| *c.borrow())
}

pub fn reset() {
    COUNTERS.with(|c| *c.borrow_mut() = ProfileSnapshot::default());
}

/// Logs the counters gathered since the last reset
pub fn log_report(round: u32) {
    if !is_profiling_enabled() {
        return;
    }

    let s = snapshot();
    let avg_us = |time_ns: u64, count: usize| {
        if count > 0 {
            time_ns as f64 / (count * 1000) as f64
        } else {
            0.0
        }
    };

    info!(
        "Round {} profile: search {:.2}ms, flood fill {} calls ({:.2}µs avg), apply_move {} calls ({:.2}µs avg), {} beta cutoffs",
        round,
        s.search_time_ns as f64 / 1_000_000.0,
        s.flood_fill_count,
        avg_us(s.flood_fill_time_ns, s.flood_fill_count),
        s.apply_move_count,
        avg_us(s.apply_move_time_ns, s.apply_move_count),
        s.beta_cutoffs
    );
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
