mod common;
mod retry_tests;
mod validation_tests;
