mod batched;
mod csr;
mod single;

pub use batched::BatchedGraph;
pub use csr::{Csr, CsrError};
pub use single::Graph;
