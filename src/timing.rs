//! A single timing helper, replacing the source's `PRINT_EXECUTION_TIME`
//! global macro with a function that brackets a closure instead of a global.

use std::time::Instant;

/// Runs `f`, logging `{name}: {elapsed} ms` at `info` level, and returns
/// `f`'s result.
pub fn time_it<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    log::info!("{name}: {:.3} ms", start.elapsed().as_secs_f64() * 1000.0);
    result
}
