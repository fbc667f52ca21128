mod auth_tests;
mod export_tests;
mod mutations_tests;
mod screens_tests;
