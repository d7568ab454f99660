// Decoding of IDX-style (MNIST) binary image and label streams

mod header;
pub use header::{read_headers, DecodedStream, HeaderField, FIELD_SIZE};

mod decode;
pub use decode::{decode, HeaderSpecs, MAGIC, N_COLS, N_IMAGES, N_LABELS, N_ROWS};
