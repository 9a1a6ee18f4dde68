pub mod checkpoint;
pub mod encoding;
pub mod network;

pub use network::Network;
