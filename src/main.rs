use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use idx_knn::config::{Command, ExportArgs, ExportFormat, KnnArgs, Opts};
use idx_knn::evaluate::evaluate;
use idx_knn::mnist::{
    load_mnist, load_set, mnist_header_specs, write_b64_items, write_csv_file, TEST_IMAGES,
    TEST_LABELS,
};
use idx_knn::Errors;

fn run_knn(args: &KnnArgs) -> Result<()> {
    let specs = mnist_header_specs(args.data.rows, args.data.cols);
    let data = load_mnist(&args.data.data_dir, &specs)?;

    // Classify the requested range of test images
    let now = Instant::now();
    let evaluation = evaluate(
        &data.test,
        &data.train,
        args.index0..args.index1(),
        args.k,
        args.strategy(),
    )
    .context("classification failed")?;
    info!(
        "Classified {} test images with k = {} [{}ms]",
        evaluation.outcomes.len(),
        args.k,
        now.elapsed().as_millis()
    );

    for outcome in &evaluation.outcomes {
        if args.verbose || !outcome.is_ok() {
            println!("{}", outcome);
        }
    }
    println!("{:.2}% ok", evaluation.accuracy());
    Ok(())
}

fn run_export(args: &ExportArgs) -> Result<()> {
    let specs = mnist_header_specs(args.data.rows, args.data.cols);
    let test = load_set(&args.data.data_dir, TEST_IMAGES, TEST_LABELS, &specs)?;
    match args.format {
        ExportFormat::B64 => write_b64_items(&args.output, &test)?,
        ExportFormat::Csv => write_csv_file(&args.output, &test)?,
    }
    info!("Wrote {} examples to {}", test.len(), args.output.display());
    Ok(())
}

// One line for the failing step, then one per structured error (or per cause)
fn error_lines(err: &anyhow::Error) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    match err.downcast_ref::<Errors>() {
        Some(errors) => {
            lines.extend(errors.iter().map(|e| format!("{}: {}", e.code(), e)));
        }
        None => lines.extend(err.chain().skip(1).map(|cause| cause.to_string())),
    }
    lines
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    let opts = Opts::parse();
    let result = match &opts.command {
        Command::Knn(args) => run_knn(args),
        Command::Export(args) => run_export(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            for line in error_lines(&err) {
                error!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}
