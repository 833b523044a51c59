//! Integration test harness: service + mock adapters + fake clock.

mod mock_hw;
mod run_loop_tests;
mod startup_tests;
