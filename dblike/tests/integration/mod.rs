mod concurrency_test;
mod config_test;
mod query_test;
mod reference_test;
mod store_test;
