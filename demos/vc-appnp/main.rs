use burn::tensor::backend::AutodiffBackend;

pub mod cli;
pub mod model;
pub mod training;

#[path = "../common/mod.rs"]
pub mod common;

use common::backend::{MainAutoBackend, MainDevice};

pub fn launch<AutoB: AutodiffBackend + MainDevice>(args: &cli::AppArgs) {
    let device = AutoB::main_device();
    training::train::<AutoB>(args, device);
}

fn main() {
    let args = cli::AppArgs::parse().unwrap();
    println!("{args:?}");
    launch::<MainAutoBackend>(&args);
}
