//! Top-level facade crate for visitrack.
//!
//! Re-exports the ledger core and the HTTP server so users can depend on a single crate.

pub mod core {
    pub use visitrack_core::*;
}

pub mod server {
    pub use visitrack_server::*;
}
