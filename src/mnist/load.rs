use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::feature::LabeledFeatures;
use crate::idx::{decode, HeaderSpecs};

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

pub const IMAGE_MAGIC: u32 = 0x803;
pub const LABEL_MAGIC: u32 = 0x801;
// MNIST images are 28 x 28 pixels
pub const MNIST_DIM: u32 = 28;

pub fn mnist_header_specs(n_rows: u32, n_cols: u32) -> HeaderSpecs {
    HeaderSpecs::idx(IMAGE_MAGIC, LABEL_MAGIC, n_rows, n_cols)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .with_context(|| format!("unable to read {}", path.display()))
}

// Load and decode one image file and its label file from `dir`
pub fn load_set(
    dir: &Path,
    images: &str,
    labels: &str,
    specs: &HeaderSpecs,
) -> Result<Vec<LabeledFeatures>> {
    let now = Instant::now();
    let image_bytes = read(&dir.join(images))?;
    let label_bytes = read(&dir.join(labels))?;
    let set = decode(specs, &image_bytes, &label_bytes)
        .with_context(|| format!("unable to decode {} / {}", images, labels))?;
    info!(
        "Loaded {} examples from {} [{}ms]",
        set.len(),
        images,
        now.elapsed().as_millis()
    );
    Ok(set)
}

pub struct MnistData {
    pub train: Vec<LabeledFeatures>,
    pub test: Vec<LabeledFeatures>,
}

// Load both the training and the test set
pub fn load_mnist(dir: &Path, specs: &HeaderSpecs) -> Result<MnistData> {
    Ok(MnistData {
        train: load_set(dir, TRAIN_IMAGES, TRAIN_LABELS, specs)?,
        test: load_set(dir, TEST_IMAGES, TEST_LABELS, specs)?,
    })
}
