// This module contains all the MNIST-specific host code: file names, header
// layouts, loading from disk and exporting decoded items

mod load;
pub use load::{
    load_mnist, load_set, mnist_header_specs, MnistData, IMAGE_MAGIC, LABEL_MAGIC, MNIST_DIM,
    TEST_IMAGES, TEST_LABELS, TRAIN_IMAGES, TRAIN_LABELS,
};

mod export;
pub use export::{write_b64_items, write_csv, write_csv_file, BASE_N_CHARS};
