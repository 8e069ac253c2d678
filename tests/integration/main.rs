//! HTTP tests against a running server

mod api_tests;
