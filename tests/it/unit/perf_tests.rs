//! Unit tests for perf module.

use fieldboard::perf::{ScopedTimer, is_profiling_enabled, set_profiling_enabled};

#[test]
fn test_scoped_timer_creation() {
    let timer = ScopedTimer::with_threshold("test_op", 1000.0);
    assert_eq!(timer.name(), "test_op");
    assert!(timer.elapsed_ms() >= 0.0);
}

#[test]
fn test_profile_scope_macro_compiles_in_any_configuration() {
    fieldboard::profile_scope!("macro_scope");
    fieldboard::profile_scope!("macro_scope_threshold", 5.0);
}

#[test]
fn test_runtime_toggle() {
    let before = is_profiling_enabled();
    set_profiling_enabled(!before);
    assert_eq!(is_profiling_enabled(), !before);
    set_profiling_enabled(before);
}
