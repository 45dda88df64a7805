use anyhow::Context;
use rdcore::prelude::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub seq_len: usize,
    pub velocity_limit: f64,
    pub noise_percentile: f64,
    pub val_ratio: f64,
    pub num_classes: usize,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(seq_len: usize, val_ratio: f64, num_classes: usize) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            seq_len,
            velocity_limit: defaults.velocity_limit,
            noise_percentile: defaults.noise_percentile,
            val_ratio,
            num_classes,
        }
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            seq_len: self.seq_len,
            velocity_limit: self.velocity_limit,
            noise_percentile: self.noise_percentile,
            ..PipelineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_pipeline_config() {
        let cfg = WorkflowConfig::from_args(120, 0.2, 3);
        let pipeline = cfg.to_pipeline_config();
        assert_eq!(pipeline.seq_len, 120);
        assert_eq!(pipeline.velocity_limit, 56.0);
        assert_eq!(pipeline.noise_percentile, 5.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"seq_len: 90\nvelocity_limit: 48.0\nnoise_percentile: 10.0\nval_ratio: 0.25\nnum_classes: 4\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.seq_len, 90);
        assert_eq!(cfg.velocity_limit, 48.0);
        assert_eq!(cfg.num_classes, 4);
    }
}
