//! Integration tests: the dashboard wired to the real provider adapters,
//! with the network replaced by a scripted source.

mod mock_source;
mod scenarios;
