use crate::cli::AppArgs;
use crate::common::alchemy::{AlchemyBatch, AlchemyBatcher, AlchemyDataset};
use crate::model;
use burn::data::dataloader::{DataLoader, DataLoaderBuilder};
use burn::module::AutodiffModule;
use burn::optim::decay::WeightDecayConfig;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::train::RegressionOutput;
use burn::train::metric::{Adaptor, Metric, MetricMetadata, Numeric};
use burn_gnn::mpnn::MpnnPredictor;
use burn_gnn::utils::loss::MaskedMseLoss;
use std::time::Instant;

pub const RANDOM_SEED: u64 = 0;

type Dataloader<B> = std::sync::Arc<dyn DataLoader<B, AlchemyBatch<B>> + 'static>;

pub fn train<AutoB: AutodiffBackend>(args: &AppArgs, device: AutoB::Device) {
    AutoB::seed(&device, RANDOM_SEED);

    let train_dataset = AlchemyDataset::train(&args.data_path, Some(args.data_size));
    let valid_dataset = AlchemyDataset::valid(&args.data_path);
    let node_in_feats = train_dataset.num_node_feats();
    let edge_in_feats = train_dataset.num_edge_feats();

    // Create the batcher
    let batcher = AlchemyBatcher::default();

    // Create the dataloaders
    let dataloader_train: Dataloader<AutoB> = DataLoaderBuilder::new(batcher.clone())
        .batch_size(args.batch_size)
        .shuffle(RANDOM_SEED)
        .num_workers(1)
        .build(train_dataset);
    let dataloader_valid: Dataloader<AutoB::InnerBackend> = DataLoaderBuilder::new(batcher)
        .batch_size(args.batch_size)
        .num_workers(1)
        .build(valid_dataset);

    let mut model = Wrap(model::model_config(node_in_feats, edge_in_feats, args).init(&device));
    let mut optim = AdamConfig::new()
        .with_weight_decay(Some(WeightDecayConfig::new(args.weight_decay)))
        .init::<AutoB, MpnnPredictor<AutoB>>();

    let train_num_items = dataloader_train.num_items();
    let mut metric_meta = MetricMetadata {
        progress: burn::data::dataloader::Progress::new(0, train_num_items),
        epoch: 1,
        epoch_total: args.epochs,
        iteration: 0,
        lr: Some(args.lr),
    };

    let mut best_mae = f64::INFINITY;
    let mut early_stopper = 0;

    for epoch in 0..args.epochs {
        metric_meta.epoch = epoch + 1;
        let start = Instant::now();
        let mut loss_metric = burn::train::metric::LossMetric::<AutoB>::new();

        // training loop
        for batch in dataloader_train.iter() {
            let n_graphs = batch.bg.n_graphs();
            metric_meta.iteration += 1;
            metric_meta.progress.items_processed += n_graphs;

            let pre_metrics = model.forward_regression(batch);
            loss_metric.update(&pre_metrics.adapt(), &metric_meta);

            let loss = pre_metrics.loss.clone();
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model.0);
            model.0 = optim.step(args.lr, model.0, grads);
        }
        let train_loss = loss_metric.running_value().current();
        let train_secs = start.elapsed().as_secs_f64();

        // validation loop
        let eval_start = Instant::now();
        let valid_model = Wrap(model.0.valid());
        let mut test_mae = 0.0;
        let mut test_iter = 0;
        for batch in dataloader_valid.iter() {
            test_mae += valid_model.mean_absolute_error(batch);
            test_iter += 1;
        }
        test_mae /= test_iter.max(1) as f64;
        if args.profile {
            println!("Eval time:{:.3} s", eval_start.elapsed().as_secs_f64());
        }

        println!(
            "Epoch {epoch}, Time {train_secs:.3} s, Train loss {train_loss}, Test mae {test_mae:.3}"
        );

        // early stop
        if test_mae < best_mae {
            best_mae = test_mae;
            early_stopper = 0;
        } else {
            early_stopper += 1;
            println!("Early stop: {early_stopper}/{}", args.patience);
            if early_stopper == args.patience {
                break;
            }
        }
    }
}

/// Wrapper over [`MpnnPredictor`] pairing it with the batch loss.
pub struct Wrap<B: Backend>(pub MpnnPredictor<B>);

impl<B: Backend> Wrap<B> {
    pub fn forward_regression(&self, batch: AlchemyBatch<B>) -> RegressionOutput<B> {
        let output = self
            .0
            .forward(batch.node_feat, batch.edge_feat, &batch.bg);
        let loss = MaskedMseLoss::new().forward(
            output.clone(),
            batch.targets.clone(),
            batch.bg.graph_mask.clone(),
        );
        RegressionOutput::new(loss, output, batch.targets)
    }

    /// Masked MAE over every target of every graph in the batch.
    pub fn mean_absolute_error(&self, batch: AlchemyBatch<B>) -> f64 {
        let [_, n_tasks] = batch.targets.dims();
        let output = self
            .0
            .forward(batch.node_feat, batch.edge_feat, &batch.bg);
        let mask = batch.bg.graph_mask.clone();
        let absolute = (output - batch.targets).abs() * mask.clone();
        let mae: f32 = (absolute.sum() / (mask.sum() * n_tasks as f32))
            .into_scalar()
            .elem();
        mae as f64
    }
}
