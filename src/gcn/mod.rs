mod conv;
mod network;

pub use conv::{GcnConv, GcnConvConfig};
pub use network::{GcnNet, GcnNetConfig};
