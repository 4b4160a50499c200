//! Bob-side MtA server: accepts TCP connections and drives the
//! three-message share-conversion protocol once per connection.

/// Server configuration
pub mod config;

/// TCP acceptor
pub mod server;

/// Per-connection protocol driver
pub mod session;
