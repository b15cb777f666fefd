/// Integration tests against a file-backed database
mod common;
mod snapshot_tests;
