//! Integration tests

mod helpers;

mod cli_test;
mod config_test;
mod navigation_test;
mod rendering_test;
