use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::{Dataset, InMemDataset};
use burn::prelude::*;
use burn_gnn::graph::{BatchedGraph, Graph};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One preprocessed Alchemy molecule: a homogeneous graph with per-node and
/// per-edge features and a vector of regression targets.
///
/// The on-disk format is JSON rows (one molecule per line) under the dataset
/// root, split into `train.jsonl` and `valid.jsonl`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AlchemyItem {
    /// # Shapes: [n_nodes][node_feat_size]
    pub node_feat: Vec<Vec<f32>>,
    /// Source endpoint of each edge.
    pub edge_src: Vec<i64>,
    /// Destination endpoint of each edge.
    pub edge_dst: Vec<i64>,
    /// # Shapes: [n_edges][edge_feat_size]
    pub edge_feat: Vec<Vec<f32>>,
    /// # Shapes: [n_tasks]
    pub targets: Vec<f32>,
}

pub struct AlchemyDataset {
    dataset: InMemDataset<AlchemyItem>,
}

impl Dataset<AlchemyItem> for AlchemyDataset {
    fn get(&self, index: usize) -> Option<AlchemyItem> {
        self.dataset.get(index)
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl AlchemyDataset {
    /// Creates the training split, optionally capped to `limit` molecules.
    pub fn train(root: &Path, limit: Option<usize>) -> Self {
        Self::new(&root.join("train.jsonl"), limit)
    }

    /// Creates the validation split.
    pub fn valid(root: &Path) -> Self {
        Self::new(&root.join("valid.jsonl"), None)
    }

    fn new(path: &Path, limit: Option<usize>) -> Self {
        let mut dataset = InMemDataset::from_json_rows(path)
            .unwrap_or_else(|err| panic!("failed to read the dataset {path:?}: {err}"));
        if let Some(limit) = limit {
            if limit < dataset.len() {
                let items: Vec<AlchemyItem> =
                    (0..limit).filter_map(|index| dataset.get(index)).collect();
                dataset = InMemDataset::new(items);
            }
        }
        Self { dataset }
    }

    /// Node feature width, read off the first molecule.
    pub fn num_node_feats(&self) -> usize {
        self.first().node_feat.first().map_or(0, Vec::len)
    }

    /// Edge feature width, read off the first molecule.
    pub fn num_edge_feats(&self) -> usize {
        self.first().edge_feat.first().map_or(0, Vec::len)
    }

    /// Regression task count, read off the first molecule.
    pub fn num_tasks(&self) -> usize {
        self.first().targets.len()
    }

    fn first(&self) -> AlchemyItem {
        self.get(0).expect("the dataset must not be empty")
    }
}

/// A mini-batch of molecules as one disjoint-union graph.
#[derive(Clone, Debug)]
pub struct AlchemyBatch<B: Backend> {
    pub bg: BatchedGraph<B>,
    /// # Shapes: [n_nodes, node_feat_size]
    pub node_feat: Tensor<B, 2>,
    /// # Shapes: [n_edges, edge_feat_size]
    pub edge_feat: Tensor<B, 2>,
    /// # Shapes: [n_graphs, n_tasks]
    pub targets: Tensor<B, 2>,
}

#[derive(Clone, Default)]
pub struct AlchemyBatcher {}

impl<B: Backend> Batcher<B, AlchemyItem, AlchemyBatch<B>> for AlchemyBatcher {
    fn batch(&self, items: Vec<AlchemyItem>, device: &B::Device) -> AlchemyBatch<B> {
        let n_graphs = items.len();
        let n_tasks = items.first().map_or(0, |item| item.targets.len());

        let mut row = Vec::new();
        let mut col = Vec::new();
        let mut node_graph_idx = Vec::new();
        let mut node_feat = Vec::new();
        let mut edge_feat = Vec::new();
        let mut targets = Vec::with_capacity(n_graphs * n_tasks);
        let mut node_feat_size = 0;
        let mut edge_feat_size = 0;

        let mut offset = 0i64;
        for (graph_idx, item) in items.into_iter().enumerate() {
            let n_nodes = item.node_feat.len() as i64;
            debug_assert_eq!(item.edge_src.len(), item.edge_dst.len());
            debug_assert_eq!(item.edge_src.len(), item.edge_feat.len());

            for feat in &item.node_feat {
                node_feat_size = feat.len();
                node_feat.extend_from_slice(feat);
            }
            for feat in &item.edge_feat {
                edge_feat_size = feat.len();
                edge_feat.extend_from_slice(feat);
            }
            row.extend(item.edge_dst.iter().map(|&dst| dst + offset));
            col.extend(item.edge_src.iter().map(|&src| src + offset));
            node_graph_idx.extend(std::iter::repeat_n(graph_idx as i64, n_nodes as usize));
            targets.extend_from_slice(&item.targets);

            offset += n_nodes;
        }

        let n_nodes = offset as usize;
        let n_edges = row.len();
        let graph = Graph::from_coo(row, col, n_nodes, device);
        let bg = BatchedGraph::new(graph, node_graph_idx, vec![1.0; n_graphs], device);

        AlchemyBatch {
            bg,
            node_feat: Tensor::from_data(
                TensorData::new(node_feat, [n_nodes, node_feat_size]).convert::<B::FloatElem>(),
                device,
            ),
            edge_feat: Tensor::from_data(
                TensorData::new(edge_feat, [n_edges, edge_feat_size]).convert::<B::FloatElem>(),
                device,
            ),
            targets: Tensor::from_data(
                TensorData::new(targets, [n_graphs, n_tasks]).convert::<B::FloatElem>(),
                device,
            ),
        }
    }
}
