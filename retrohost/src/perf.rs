//! Performance counters cores register through `GET_PERF_INTERFACE`.
use log::{info, warn};
use std::ffi::CStr;
use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::{cpu, ffi};

/// Maximum number of counters kept per session.
pub const MAX_COUNTERS: usize = 64;

/// The counters registered by the running core.
///
/// Counters live in core memory; the registry only stores their addresses and must be cleared
/// before the core is unloaded.
#[derive(Debug, Default)]
pub struct PerfRegistry {
    counters: Vec<*mut ffi::retro_perf_counter>,
}

impl PerfRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Records `counter` and marks it registered.
    ///
    /// # Safety
    /// `counter` must be null or valid until [`clear`](PerfRegistry::clear) is called.
    pub unsafe fn register(&mut self, counter: *mut ffi::retro_perf_counter) -> bool {
        if counter.is_null() {
            return false;
        }
        if self.counters.len() >= MAX_COUNTERS {
            warn!("Too many performance counters, ignoring registration");
            return false;
        }
        (*counter).registered = true;
        self.counters.push(counter);
        true
    }

    /// Logs every registered counter.
    pub fn log(&self) {
        for &counter in &self.counters {
            // SAFETY: guaranteed by the contract of `register`.
            let counter = unsafe { &*counter };
            let ident = if counter.ident.is_null() {
                "<unnamed>".into()
            } else {
                // SAFETY: counter identifiers are C strings owned by the core.
                unsafe { CStr::from_ptr(counter.ident) }.to_string_lossy()
            };
            let average = counter.total.checked_div(counter.call_cnt).unwrap_or(0);
            info!(
                "[PERF]: Avg ({}): {} ticks, {} runs.",
                ident, average, counter.call_cnt
            );
        }
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// Wall clock time in microseconds.
pub(crate) unsafe extern "C" fn get_time_usec() -> ffi::retro_time_t {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as ffi::retro_time_t)
        .unwrap_or(0)
}

/// Monotonic ticks in nanoseconds.
pub(crate) unsafe extern "C" fn get_perf_counter() -> ffi::retro_perf_tick_t {
    epoch().elapsed().as_nanos() as ffi::retro_perf_tick_t
}

pub(crate) unsafe extern "C" fn get_cpu_features() -> u64 {
    cpu::detect().bits()
}

pub(crate) unsafe extern "C" fn perf_start(counter: *mut ffi::retro_perf_counter) {
    if let Some(counter) = counter.as_mut() {
        counter.call_cnt += 1;
        counter.start = get_perf_counter();
    }
}

pub(crate) unsafe extern "C" fn perf_stop(counter: *mut ffi::retro_perf_counter) {
    if let Some(counter) = counter.as_mut() {
        counter.total += get_perf_counter().saturating_sub(counter.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_start_stop_accumulates() {
        let ident = CString::new("decode").unwrap();
        let mut counter = ffi::retro_perf_counter {
            ident: ident.as_ptr(),
            ..Default::default()
        };
        unsafe {
            perf_start(&mut counter);
            perf_stop(&mut counter);
            perf_start(&mut counter);
            perf_stop(&mut counter);
        }
        assert_eq!(counter.call_cnt, 2);
        assert!(!counter.registered);
    }

    #[test]
    fn test_register_marks_counter() {
        let mut registry = PerfRegistry::new();
        let mut counter = ffi::retro_perf_counter::default();
        assert!(unsafe { registry.register(&mut counter) });
        assert!(counter.registered);
        assert!(!unsafe { registry.register(std::ptr::null_mut()) });
        assert_eq!(registry.len(), 1);
        registry.log();
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_limit() {
        let mut registry = PerfRegistry::new();
        let mut counters = vec![ffi::retro_perf_counter::default(); MAX_COUNTERS + 1];
        let mut accepted = 0;
        for counter in counters.iter_mut() {
            if unsafe { registry.register(counter) } {
                accepted += 1;
            }
        }
        assert_eq!(accepted, MAX_COUNTERS);
    }

    #[test]
    fn test_clocks_advance() {
        let a = unsafe { get_perf_counter() };
        let b = unsafe { get_perf_counter() };
        assert!(b >= a);
        assert!(unsafe { get_time_usec() } > 0);
        assert_eq!(unsafe { get_cpu_features() }, cpu::detect().bits());
    }
}
