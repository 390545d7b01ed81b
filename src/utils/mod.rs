pub mod elu;
pub mod loss;

pub use elu::elu;
