mod common;
mod load_tests;
mod manifest_tests;
