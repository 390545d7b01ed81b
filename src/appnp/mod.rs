mod conv;
mod network;

pub use conv::{AppnpConv, AppnpConvConfig};
pub use network::{AppnpNet, AppnpNetConfig};
