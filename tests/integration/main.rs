//! HTTP integration tests against the in-memory store.

mod share_test;
mod shared_access_test;
