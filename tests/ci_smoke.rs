//! CI smoke test: runs the GCN vertex-classification demo end to end on a
//! small synthetic dataset and asserts the printed test accuracy, the same
//! contract the training logs promise to downstream automation.

use ndarray::{Array1, Array2};
use ndarray_npy::NpzWriter;
use std::fs::File;
use std::path::Path;
use std::process::Command;

const N_CLASSES: usize = 3;
const NODES_PER_CLASS: usize = 30;
const FEAT_SIZE: usize = 8;
const TRAIN_PER_CLASS: usize = 10;

/// Three communities with class-indicative features: each node carries a
/// one-hot class signal plus small deterministic noise, and edges form a
/// ring inside each community (plus self loops).
fn write_synthetic_dataset(path: &Path) {
    let n_nodes = N_CLASSES * NODES_PER_CLASS;

    let mut noise_state = 0x2545F4914F6CDD1Du64;
    let mut noise = move || {
        // xorshift, scaled to [-0.05, 0.05]
        noise_state ^= noise_state << 13;
        noise_state ^= noise_state >> 7;
        noise_state ^= noise_state << 17;
        (noise_state >> 40) as f32 / (1u64 << 24) as f32 * 0.1 - 0.05
    };

    let mut feat = Array2::<f32>::zeros((n_nodes, FEAT_SIZE));
    let mut label = Array1::<i64>::zeros(n_nodes);
    let mut train_mask = Array1::<bool>::from_elem(n_nodes, false);
    let mut test_mask = Array1::<bool>::from_elem(n_nodes, false);
    for node in 0..n_nodes {
        let class = node / NODES_PER_CLASS;
        label[node] = class as i64;
        for dim in 0..FEAT_SIZE {
            let signal = if dim == class { 1.0 } else { 0.0 };
            feat[(node, dim)] = signal + noise();
        }
        if node % NODES_PER_CLASS < TRAIN_PER_CLASS {
            train_mask[node] = true;
        } else {
            test_mask[node] = true;
        }
    }

    // ring inside each community, plus a self loop per node
    let mut indptr = Vec::with_capacity(n_nodes + 1);
    let mut indices = Vec::new();
    indptr.push(0i64);
    for node in 0..n_nodes {
        let class_base = node / NODES_PER_CLASS * NODES_PER_CLASS;
        let in_class = node - class_base;
        let prev = class_base + (in_class + NODES_PER_CLASS - 1) % NODES_PER_CLASS;
        let next = class_base + (in_class + 1) % NODES_PER_CLASS;
        indices.extend([prev as i64, node as i64, next as i64]);
        indptr.push(indices.len() as i64);
    }

    let mut npz = NpzWriter::new(File::create(path).unwrap());
    npz.add_array("feat", &feat).unwrap();
    npz.add_array("label", &label).unwrap();
    npz.add_array("train_mask", &train_mask).unwrap();
    npz.add_array("test_mask", &test_mask).unwrap();
    npz.add_array("adj_csr_indptr", &Array1::from_vec(indptr)).unwrap();
    npz.add_array("adj_csr_indices", &Array1::from_vec(indices)).unwrap();
    npz.finish().unwrap();
}

#[test]
fn vc_gcn_reports_passing_test_accuracy() {
    let tmp = temp_dir::TempDir::new().unwrap();
    let data_path = tmp.path().join("synthetic_vc.npz");
    write_synthetic_dataset(&data_path);

    let output = Command::new(env!("CARGO"))
        .args(["run", "--example", "vc-gcn", "--"])
        .arg("--data-path")
        .arg(&data_path)
        .args(["--epochs", "60"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to launch the training run");
    assert!(
        output.status.success(),
        "training run failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let last_info = stdout
        .lines()
        .filter(|line| line.contains("Test acc:"))
        .next_back()
        .expect("no accuracy was logged");
    let test_acc: f64 = last_info
        .split("Test acc:")
        .last()
        .unwrap()
        .trim()
        .parse()
        .expect("malformed accuracy log line");
    assert!(test_acc > 0.6, "test accuracy too low: {test_acc}");
}
