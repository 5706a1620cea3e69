//! CLI integration test harness

mod cli_tests;
