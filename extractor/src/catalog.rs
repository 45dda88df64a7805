use anyhow::{bail, Context};
use log::warn;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Subdirectory holding the raw echo `.dat` streams.
pub const RAW_DIR: &str = "raw_echo";
/// Subdirectory holding the plot (point-track) text files.
pub const POINT_DIR: &str = "point_tracks";
/// Subdirectory holding the filtered track text files.
pub const TRACK_DIR: &str = "tracks";

/// One batch: a raw echo stream plus its point/track companions. The text
/// companions are located here but parsed downstream.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFile {
    pub batch_num: u32,
    pub label: u32,
    pub raw_file: PathBuf,
    pub point_file: PathBuf,
    pub track_file: PathBuf,
}

impl BatchFile {
    /// Zero-based class index; labels are 1-based on disk.
    pub fn class_index(&self) -> Option<usize> {
        (self.label >= 1).then(|| self.label as usize - 1)
    }
}

/// Parses a raw stream name of the form `{batch}_Label_{label}.dat`.
fn parse_raw_name(name: &str) -> Option<(u32, u32)> {
    let stem = name.strip_suffix(".dat")?;
    let (batch, label) = stem.split_once("_Label_")?;
    Some((batch.parse().ok()?, label.parse().ok()?))
}

fn find_companion(dir: &Path, prefix: &str) -> anyhow::Result<Option<PathBuf>> {
    for entry in
        fs::read_dir(dir).with_context(|| format!("listing companions in {}", dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(prefix) && name.ends_with(".txt") {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

/// Enumerates the batch catalog under a data root. Batches missing a point or
/// track companion are skipped with a warning; an empty catalog is an error.
pub fn scan_batch_files(root: &Path) -> anyhow::Result<Vec<BatchFile>> {
    let raw_dir = root.join(RAW_DIR);
    let point_dir = root.join(POINT_DIR);
    let track_dir = root.join(TRACK_DIR);
    for dir in [&raw_dir, &point_dir, &track_dir] {
        if !dir.is_dir() {
            bail!(
                "data root {} must contain the {}, {} and {} subdirectories",
                root.display(),
                RAW_DIR,
                POINT_DIR,
                TRACK_DIR
            );
        }
    }

    let mut batches = Vec::new();
    for entry in fs::read_dir(&raw_dir)
        .with_context(|| format!("listing raw streams in {}", raw_dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let (batch_num, label) = match parse_raw_name(&name) {
            Some(parsed) => parsed,
            None => continue,
        };

        let point_prefix = format!("PointTracks_{batch_num}_{label}_");
        let track_prefix = format!("Tracks_{batch_num}_{label}_");
        let point_file = find_companion(&point_dir, &point_prefix)?;
        let track_file = find_companion(&track_dir, &track_prefix)?;
        match (point_file, track_file) {
            (Some(point_file), Some(track_file)) => batches.push(BatchFile {
                batch_num,
                label,
                raw_file: entry.path(),
                point_file,
                track_file,
            }),
            (point, track) => {
                warn!(
                    "batch {batch_num} label {label}: missing {}{}file, skipped",
                    if point.is_none() { "point " } else { "" },
                    if track.is_none() { "track " } else { "" },
                );
            }
        }
    }

    if batches.is_empty() {
        bail!(
            "no batch files matching {{batch}}_Label_{{label}}.dat under {}",
            raw_dir.display()
        );
    }
    batches.sort_by_key(|batch| (batch.batch_num, batch.label));
    Ok(batches)
}

/// Splits the catalog into train/validation sets class by class, preserving
/// the requested validation ratio per class.
pub fn split_train_val(
    batches: Vec<BatchFile>,
    num_classes: usize,
    val_ratio: f64,
    shuffle: bool,
) -> (Vec<BatchFile>, Vec<BatchFile>) {
    let mut by_class: Vec<Vec<BatchFile>> = (0..num_classes).map(|_| Vec::new()).collect();
    for batch in batches {
        match batch.class_index() {
            Some(class) if class < num_classes => by_class[class].push(batch),
            _ => {}
        }
    }

    let mut rng = rand::thread_rng();
    let mut train = Vec::new();
    let mut val = Vec::new();
    for mut class_batches in by_class {
        if shuffle {
            class_batches.shuffle(&mut rng);
        }
        let train_count =
            (class_batches.len() as f64 * (1.0 - val_ratio)) as usize;
        let mut rest = class_batches.split_off(train_count);
        train.append(&mut class_batches);
        val.append(&mut rest);
    }
    (train, val)
}
