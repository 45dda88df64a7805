use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod catalog;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline radar echo sequence extraction driver")]
struct Args {
    /// Data root containing raw_echo/, point_tracks/ and tracks/
    #[arg(long)]
    data_root: PathBuf,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 180)]
    seq_len: usize,
    #[arg(long, default_value_t = 0.2)]
    val_ratio: f64,
    #[arg(long, default_value_t = 2)]
    num_classes: usize,
    /// List the batch catalog and exit without processing
    #[arg(long, default_value_t = false)]
    list: bool,
    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.seq_len, args.val_ratio, args.num_classes)
    };

    let batches = catalog::scan_batch_files(&args.data_root)?;
    if args.list {
        for batch in &batches {
            println!(
                "batch {} label {} -> {}",
                batch.batch_num,
                batch.label,
                batch.raw_file.display()
            );
        }
        return Ok(());
    }

    let (train, val) =
        catalog::split_train_val(batches, config.num_classes, config.val_ratio, true);
    println!("train batches {}, val batches {}", train.len(), val.len());

    let ordered: Vec<_> = train.iter().chain(val.iter()).cloned().collect();
    let runner = Runner::new(config);
    let summary = runner.execute(&ordered);

    println!(
        "sequences {}, failures {}, frames emitted {} (skipped {} structural / {} physical)",
        summary.sequences,
        summary.failures.len(),
        summary.metrics.emitted,
        summary.metrics.skipped_structural,
        summary.metrics.skipped_physical,
    );

    if let Some(path) = args.summary {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let report = serde_json::to_string_pretty(&summary)?;
        fs::write(&path, report)
            .with_context(|| format!("writing run summary {}", path.display()))?;
    }
    Ok(())
}
