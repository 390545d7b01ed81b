use crate::cli::AppArgs;
use crate::common::cora::GraphDataset;
use crate::model;
use burn::module::AutodiffModule;
use burn::optim::decay::WeightDecayConfig;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn_gnn::appnp::AppnpNet;
use burn_gnn::graph::Graph;
use burn_gnn::utils::loss::MaskedCrossEntropyLoss;
use std::time::Instant;

pub const RANDOM_SEED: u64 = 0;
/// Leading epochs excluded from the averaged timing while caches and
/// kernels warm up.
pub const WARM_UP: usize = 3;

pub fn train<AutoB: AutodiffBackend>(args: &AppArgs, device: AutoB::Device) {
    AutoB::seed(&device, RANDOM_SEED);

    let ds = GraphDataset::open(&args.data_path);
    let model_config = model::model_config(ds.feat_size(), ds.n_classes(), args);

    // whole-graph training: the dataset is materialized once per backend
    let graph: Graph<AutoB> = ds.graph(&device);
    let x: Tensor<AutoB, 2> = ds.features(&device);
    let y: Tensor<AutoB, 1, Int> = ds.labels(&device);
    let train_mask: Tensor<AutoB, 1> = ds.train_mask(&device);

    let eval_graph: Graph<AutoB::InnerBackend> = ds.graph(&device);
    let eval_x: Tensor<AutoB::InnerBackend, 2> = ds.features(&device);
    let eval_y: Tensor<AutoB::InnerBackend, 1, Int> = ds.labels(&device);
    let eval_test_mask: Option<Tensor<AutoB::InnerBackend, 1>> = ds.test_mask(&device);

    let mut model: AppnpNet<AutoB> = model_config.init(&device);
    let mut optim = AdamConfig::new()
        .with_weight_decay(Some(WeightDecayConfig::new(args.weight_decay)))
        .init::<AutoB, AppnpNet<AutoB>>();
    let loss_fn = MaskedCrossEntropyLoss::new();

    let mut total_ms = 0.0f64;
    for epoch in 0..args.epochs {
        let beg = Instant::now();
        let logits = model.forward(x.clone(), &graph);
        let loss = loss_fn.forward(logits, y.clone(), train_mask.clone());
        let train_loss: f32 = loss.clone().into_scalar().elem();

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(args.lr, model, grads);
        let epoch_ms = beg.elapsed().as_secs_f64() * 1e3;
        if epoch >= WARM_UP {
            total_ms += epoch_ms;
        }

        if let Some(test_mask) = &eval_test_mask {
            let eval_beg = Instant::now();
            let valid_model = model.valid();
            let logits = valid_model.forward(eval_x.clone(), &eval_graph);
            let test_acc = accuracy(logits, eval_y.clone(), test_mask.clone());
            if args.profile {
                println!(
                    "Eval time:{} ms",
                    eval_beg.elapsed().as_secs_f64() * 1e3
                );
            }
            println!("Epoch time:{epoch_ms} ms Train loss {train_loss} Test acc:{test_acc}");
        } else {
            println!("Epoch time:{epoch_ms} ms Train loss {train_loss}");
        }
    }

    let measured = args.epochs.saturating_sub(WARM_UP).max(1);
    println!(
        "Model:{} Dataset:{} Avg epoch time:{}",
        "APPNP",
        args.data_path.display(),
        total_ms / measured as f64
    );
}

/// Fraction of correctly predicted nodes among those kept by the mask.
pub fn accuracy<B: Backend>(
    logits: Tensor<B, 2>,
    labels: Tensor<B, 1, Int>,
    mask: Tensor<B, 1>,
) -> f64 {
    let predict = logits.argmax(1).squeeze_dim::<1>(1);
    let correct = predict.equal(labels).float() * mask.clone();
    let acc: f32 = (correct.sum() / mask.sum()).into_scalar().elem();
    acc as f64
}
