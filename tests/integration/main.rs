//! Integration tests: the HTTP client and services against a fake backend

mod fake_backend;
mod http_backend_tests;
mod services_tests;
