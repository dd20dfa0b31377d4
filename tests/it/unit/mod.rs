//! Unit tests for fieldboard.

mod perf_tests;
