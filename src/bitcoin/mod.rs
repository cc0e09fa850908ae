//! Bitcoin protocol collaborators
//!
//! - Shared 2-of-2 address derivation and server key derivation
//! - Transaction size estimation
//! - Network selection

pub mod derivation;
pub mod network;
pub mod size;

// Re-export main types
pub use derivation::{AddressKind, KeyDeriver, MultisigDeriver};
pub use network::parse_network;
pub use size::{LinearSizeEstimator, SizeEstimator};
