use burn::prelude::*;
use burn_gnn::graph::{Csr, Graph};
use ndarray::{Array1, Array2};
use ndarray_npy::NpzReader;
use num_traits::AsPrimitive;
use std::fs::File;
use std::path::Path;

/// A vertex-classification graph stored as an `.npz` archive, in the layout
/// of the Cora-with-masks dumps:
///
/// - `feat`: `[n_nodes, feat_size]` f32 node features
/// - `label`: `[n_nodes]` i64 class per node
/// - `train_mask`: `[n_nodes]` bool
/// - `test_mask`: `[n_nodes]` bool (optional)
/// - `adj_csr_indptr`: `[n_nodes + 1]` i64
/// - `adj_csr_indices`: `[n_edges]` i64, rows are destination nodes
///
/// The whole graph is small enough to sit in memory, so everything is read
/// eagerly and turned into backend tensors on demand.
pub struct GraphDataset {
    features: Vec<f32>,
    feat_size: usize,
    labels: Vec<i64>,
    train_mask: Vec<bool>,
    test_mask: Option<Vec<bool>>,
    csr: Csr,
    n_classes: usize,
}

impl GraphDataset {
    pub fn open(path: &Path) -> Self {
        let file = File::open(path)
            .unwrap_or_else(|err| panic!("failed to open the dataset {path:?}: {err}"));
        let mut npz = NpzReader::new(file)
            .unwrap_or_else(|err| panic!("failed to read the archive {path:?}: {err}"));

        let features: Array2<f32> = by_name(&mut npz, "feat");
        let labels: Array1<i64> = by_name(&mut npz, "label");
        let train_mask: Array1<bool> = by_name(&mut npz, "train_mask");
        let test_mask: Option<Array1<bool>> = by_name_opt(&mut npz, "test_mask");
        let indptr: Array1<i64> = by_name(&mut npz, "adj_csr_indptr");
        let indices: Array1<i64> = by_name(&mut npz, "adj_csr_indices");

        let csr = Csr::new(indptr.to_vec(), indices.to_vec())
            .unwrap_or_else(|err| panic!("malformed adjacency in {path:?}: {err}"));
        let n_nodes = features.nrows();
        assert_eq!(n_nodes, csr.n_nodes(), "feature/adjacency node mismatch");
        assert_eq!(n_nodes, labels.len(), "feature/label node mismatch");
        assert_eq!(n_nodes, train_mask.len(), "feature/mask node mismatch");

        let n_classes: usize = (labels.iter().copied().max().unwrap_or(0) + 1).as_();
        let feat_size = features.ncols();

        GraphDataset {
            features: features.into_raw_vec_and_offset().0,
            feat_size,
            labels: labels.to_vec(),
            train_mask: train_mask.to_vec(),
            test_mask: test_mask.map(|mask| mask.to_vec()),
            csr,
            n_classes,
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.csr.n_nodes()
    }

    pub fn feat_size(&self) -> usize {
        self.feat_size
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn has_test_mask(&self) -> bool {
        self.test_mask.is_some()
    }

    pub fn graph<B: Backend>(&self, device: &B::Device) -> Graph<B> {
        Graph::from_csr(&self.csr, device)
    }

    /// # Shapes: [n_nodes, feat_size]
    pub fn features<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        Tensor::from_data(
            TensorData::new(self.features.clone(), [self.n_nodes(), self.feat_size])
                .convert::<B::FloatElem>(),
            device,
        )
    }

    /// # Shapes: [n_nodes]
    pub fn labels<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1, Int> {
        Tensor::from_data(
            TensorData::new(self.labels.clone(), [self.n_nodes()]).convert::<B::IntElem>(),
            device,
        )
    }

    /// The training mask as 0.0/1.0 weights.
    ///
    /// # Shapes: [n_nodes]
    pub fn train_mask<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        mask_tensor(&self.train_mask, device)
    }

    /// See [`Self::train_mask`].
    pub fn test_mask<B: Backend>(&self, device: &B::Device) -> Option<Tensor<B, 1>> {
        self.test_mask.as_ref().map(|mask| mask_tensor(mask, device))
    }
}

fn mask_tensor<B: Backend>(mask: &[bool], device: &B::Device) -> Tensor<B, 1> {
    let weights: Vec<f32> = mask.iter().map(|&keep| if keep { 1.0 } else { 0.0 }).collect();
    Tensor::from_data(
        TensorData::new(weights, [mask.len()]).convert::<B::FloatElem>(),
        device,
    )
}

fn by_name<S, D>(npz: &mut NpzReader<File>, name: &str) -> ndarray::ArrayBase<S, D>
where
    S: ndarray::DataOwned,
    D: ndarray::Dimension,
    S::Elem: ndarray_npy::ReadableElement,
{
    by_name_opt(npz, name).unwrap_or_else(|| panic!("array {name:?} missing from the archive"))
}

fn by_name_opt<S, D>(npz: &mut NpzReader<File>, name: &str) -> Option<ndarray::ArrayBase<S, D>>
where
    S: ndarray::DataOwned,
    D: ndarray::Dimension,
    S::Elem: ndarray_npy::ReadableElement,
{
    // numpy stores each array as "<name>.npy" inside the archive
    npz.by_name(name)
        .or_else(|_| npz.by_name(&format!("{name}.npy")))
        .ok()
}
