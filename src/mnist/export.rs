use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::feature::LabeledFeatures;

// Width of the zero-padded item number in per-item file names
pub const BASE_N_CHARS: usize = 6;

fn write_file(path: &Path, contents: String) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("unable to write {}", path.display()))
}

// One pair of files per item, named by its zero-padded index:
// - NNNNNN.b64 holds the base64 of the features in double quotes
// - NNNNNN.label holds the label
pub fn write_b64_items(dir: &Path, items: &[LabeledFeatures]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("unable to create {}", dir.display()))?;
    for (i, item) in items.iter().enumerate() {
        let base = format!("{:0width$}", i, width = BASE_N_CHARS);
        let features = STANDARD.encode(item.features.as_bytes());
        write_file(&dir.join(format!("{}.b64", base)), format!("\"{}\"\n", features))?;
        write_file(&dir.join(format!("{}.label", base)), format!("{}\n", item.label))?;
    }
    Ok(())
}

// Decoded items as CSV, in the layout used by the MNIST CSV mirrors:
// - No headers
// - One item per row
// - Each row starts with the label
// - The rest of the row are the feature values, 0-255
pub fn write_csv<W: io::Write>(writer: W, items: &[LabeledFeatures]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for item in items {
        let row = std::iter::once(item.label.clone())
            .chain(item.features.iter().map(|value| value.to_string()));
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, items: &[LabeledFeatures]) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    write_csv(io::BufWriter::new(file), items)
        .with_context(|| format!("unable to write {}", path.display()))
}
