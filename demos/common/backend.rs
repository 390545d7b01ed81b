use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;

pub type Element = f32;

#[cfg(feature = "dev-ndarray")]
pub type MainBackend = burn::backend::NdArray<Element, i32>;
#[cfg(all(feature = "dev-wgpu", not(feature = "dev-ndarray")))]
pub type MainBackend = burn::backend::wgpu::Wgpu<Element, i32>;
#[cfg(all(feature = "dev-cuda", not(any(feature = "dev-ndarray", feature = "dev-wgpu"))))]
pub type MainBackend = burn::backend::Cuda<Element, i32>;

pub trait MainDevice: Backend {
    fn main_device() -> <Self as Backend>::Device {
        Default::default()
    }
}

#[cfg(feature = "_dev-has-backend")]
impl MainDevice for MainBackend {}

#[cfg(feature = "_dev-has-backend")]
pub type MainAutoBackend = burn::backend::Autodiff<MainBackend>;
#[cfg(feature = "_dev-has-backend")]
impl MainDevice for MainAutoBackend {
    fn main_device() -> <Self as Backend>::Device {
        <<Self as AutodiffBackend>::InnerBackend as MainDevice>::main_device()
    }
}

#[cfg(not(feature = "_dev-has-backend"))]
mod err {
    use super::*;
    std::compile_error!("No dev backend selected. Please check Cargo.toml for more info.");

    // pretend to fallback to ndarray (to avoid too many other unrelated errors)
    pub type MainBackend = burn::backend::NdArray<Element, i32>;
    impl MainDevice for MainBackend {}
    pub type MainAutoBackend = burn::backend::Autodiff<MainBackend>;
    impl MainDevice for MainAutoBackend {}
}
#[cfg(not(feature = "_dev-has-backend"))]
pub use err::*;
