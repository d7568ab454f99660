use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::evaluate::Strategy;
use crate::knn::DEFAULT_K;
use crate::mnist::MNIST_DIM;

// Number of test images classified when --index1 isn't given
pub const DEFAULT_N_TESTS: usize = 200;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "k-nearest-neighbor classification of MNIST IDX data")]
pub struct Opts {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify a range of test images against the training set
    Knn(KnnArgs),
    /// Decode the test set and write out every item
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory holding the four MNIST IDX files
    #[arg(value_name = "MNIST_DATA_DIR")]
    pub data_dir: PathBuf,
    /// Required number of rows per image
    #[arg(long, value_name = "N", default_value_t = MNIST_DIM)]
    pub rows: u32,
    /// Required number of columns per image
    #[arg(long, value_name = "N", default_value_t = MNIST_DIM)]
    pub cols: u32,
}

#[derive(Args, Debug, Clone)]
pub struct KnnArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Hyper-parameter for the KNN algorithm
    #[arg(short, long, value_name = "K", default_value_t = DEFAULT_K, value_parser = parse_k)]
    pub k: usize,
    /// Index of the first test image to be classified
    #[arg(long, value_name = "INDEX0", default_value_t = 0)]
    pub index0: usize,
    /// Index one beyond the last test image to be classified [default: INDEX0 + 200]
    #[arg(long, value_name = "INDEX1")]
    pub index1: Option<usize>,
    /// Report the classification result for every test image, not just misses
    #[arg(short, long)]
    pub verbose: bool,
    /// Split each training scan into this many parallel partitions
    /// instead of classifying test images in parallel
    #[arg(long, value_name = "N", verbatim_doc_comment)]
    pub partitions: Option<usize>,
}

impl KnnArgs {
    pub fn index1(&self) -> usize {
        self.index1.unwrap_or(self.index0.saturating_add(DEFAULT_N_TESTS))
    }

    pub fn strategy(&self) -> Strategy {
        match self.partitions {
            Some(partitions) => Strategy::PartitionedTrain(partitions),
            None => Strategy::PerItem,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One NNNNNN.b64 and one NNNNNN.label file per item
    B64,
    /// A single CSV file, label first
    Csv,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Output directory (b64) or file (csv)
    #[arg(value_name = "OUT")]
    pub output: PathBuf,
    /// Layout of the exported items
    #[arg(long, value_enum, default_value_t = ExportFormat::B64)]
    pub format: ExportFormat,
}

fn parse_k(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("k must be at least 1".to_string()),
        Ok(k) => Ok(k),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knn_defaults() {
        let opts = Opts::try_parse_from(["idx-knn", "knn", "data"]).unwrap();
        let Command::Knn(args) = opts.command else {
            panic!("expected knn command");
        };
        assert_eq!(args.k, DEFAULT_K);
        assert_eq!(args.index0, 0);
        assert_eq!(args.index1(), DEFAULT_N_TESTS);
        assert_eq!(args.data.rows, 28);
        assert_eq!(args.strategy(), Strategy::PerItem);
    }

    #[test]
    fn test_knn_flags() {
        let opts = Opts::try_parse_from([
            "idx-knn",
            "knn",
            "--k=5",
            "--index0=10",
            "--verbose",
            "--partitions",
            "4",
            "--rows",
            "2",
            "data",
        ])
        .unwrap();
        let Command::Knn(args) = opts.command else {
            panic!("expected knn command");
        };
        assert_eq!(args.k, 5);
        assert_eq!(args.index1(), 210);
        assert!(args.verbose);
        assert_eq!(args.data.rows, 2);
        assert_eq!(args.data.cols, 28);
        assert_eq!(args.strategy(), Strategy::PartitionedTrain(4));
    }

    #[test]
    fn test_short_k() {
        let opts = Opts::try_parse_from(["idx-knn", "knn", "-k", "7", "data"]).unwrap();
        let Command::Knn(args) = opts.command else {
            panic!("expected knn command");
        };
        assert_eq!(args.k, 7);
    }

    #[test]
    fn test_rejects_zero_k() {
        assert!(Opts::try_parse_from(["idx-knn", "knn", "-k", "0", "data"]).is_err());
    }

    #[test]
    fn test_export_args() {
        let opts = Opts::try_parse_from(["idx-knn", "export", "data", "out"]).unwrap();
        let Command::Export(args) = opts.command else {
            panic!("expected export command");
        };
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.format, ExportFormat::B64);

        let argv = ["idx-knn", "export", "--format", "csv", "data", "out.csv"];
        let opts = Opts::try_parse_from(argv).unwrap();
        let Command::Export(args) = opts.command else {
            panic!("expected export command");
        };
        assert_eq!(args.format, ExportFormat::Csv);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Opts::command().debug_assert();
    }
}
