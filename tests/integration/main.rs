mod cli_tests;
mod config_tests;
mod crawl_tests;
