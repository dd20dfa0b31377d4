//! Integration tests for multi-component workflows.

mod pointer_tests;
