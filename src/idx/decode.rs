use crate::error::{AppError, Result};
use crate::feature::LabeledFeatures;
use crate::idx::header::{read_headers, HeaderField};

// Header field names the decoder needs to find in the parsed headers
pub const MAGIC: &str = "magic";
pub const N_IMAGES: &str = "n_images";
pub const N_ROWS: &str = "n_rows";
pub const N_COLS: &str = "n_cols";
pub const N_LABELS: &str = "n_labels";

/// Header layouts for a pair of image and label streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpecs {
    pub images: Vec<HeaderField>,
    pub labels: Vec<HeaderField>,
}

impl HeaderSpecs {
    // Standard IDX layout: magic and counts, with the image dimensions pinned
    pub fn idx(image_magic: u32, label_magic: u32, n_rows: u32, n_cols: u32) -> Self {
        HeaderSpecs {
            images: vec![
                HeaderField::exact(MAGIC, image_magic),
                HeaderField::read(N_IMAGES),
                HeaderField::exact(N_ROWS, n_rows),
                HeaderField::exact(N_COLS, n_cols),
            ],
            labels: vec![
                HeaderField::exact(MAGIC, label_magic),
                HeaderField::read(N_LABELS),
            ],
        }
    }
}

/// Decode an image stream and a label stream into labeled feature vectors.
///
/// Image `i` is the `n_rows * n_cols` byte slice at `i * n_rows * n_cols` and is
/// paired with label byte `i` rendered in decimal. Output order is file order.
///
/// Errors:
/// - `BAD_VALUE`: a header field does not match the value required by `specs`.
/// - `BAD_FORMAT`: a header is truncated or missing, a payload length is
///   inconsistent with its header, or the image and label counts differ.
pub fn decode(
    specs: &HeaderSpecs,
    image_bytes: &[u8],
    label_bytes: &[u8],
) -> Result<Vec<LabeledFeatures>> {
    let images = read_headers(&specs.images, image_bytes)?;
    let labels = read_headers(&specs.labels, label_bytes)?;

    let n_images = images.require(N_IMAGES)?;
    let n_rows = images.require(N_ROWS)?;
    let n_cols = images.require(N_COLS)?;
    let n_labels = labels.require(N_LABELS)?;

    // Widened so absurd headers can never overflow into a false match
    let image_len = n_rows as u64 * n_cols as u64;
    let expected = image_len.saturating_mul(n_images as u64);
    if expected != images.data.len() as u64 {
        return Err(AppError::ImageDataLength {
            expected,
            n_rows,
            n_cols,
            n_images,
            actual: images.data.len(),
        }
        .into());
    }
    if n_labels as usize != labels.data.len() {
        return Err(AppError::LabelDataLength {
            expected: n_labels,
            actual: labels.data.len(),
        }
        .into());
    }
    if n_images != n_labels {
        return Err(AppError::CountMismatch { n_images, n_labels }.into());
    }

    // Payload length now equals n_images * image_len, so these fit in usize
    let image_len = image_len as usize;
    Ok(labels
        .data
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let start = i * image_len;
            LabeledFeatures::new(&images.data[start..start + image_len], label.to_string())
        })
        .collect())
}
