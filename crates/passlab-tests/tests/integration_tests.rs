//! Integration tests module that includes all integration test files.

#[path = "integration/cli_tests.rs"]
mod cli_tests;

#[path = "integration/condense_tests.rs"]
mod condense_tests;

#[path = "integration/pipeline_tests.rs"]
mod pipeline_tests;

#[path = "integration/parser_tests.rs"]
mod parser_tests;

#[path = "integration/session_tests.rs"]
mod session_tests;
