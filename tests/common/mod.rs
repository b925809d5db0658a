#![allow(dead_code)]

/// Route the crate's tracing events to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn abs_diff(a: &i64, b: &i64) -> f64 {
    (a - b).abs() as f64
}
