// Shared fixture for use case tests: a tiny model trained for one
// epoch on the NdArray backend, saved to `<dir>/ckpt`.

use std::{fs, path::Path};

use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::trainer::train_loop;

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

pub fn train_csv(dir: &Path) -> String {
    let path = dir.join("train.csv");
    fs::write(
        &path,
        "id,text,label\n\
         1,good good day,1\n\
         2,bad awful day,0\n\
         3,#SoGood,1\n\
         4,so bad,0\n\
         5,good,1\n\
         6,awful,0\n",
    )
    .unwrap();
    path.to_string_lossy().into_owned()
}

/// Returns the checkpoint directory
pub fn trained_checkpoint(dir: &Path) -> String {
    let cfg = TrainConfig {
        train_csv:      train_csv(dir),
        checkpoint_dir: dir.join("ckpt").to_string_lossy().into_owned(),
        embedding_dim:  4,
        hidden_size:    3,
        batch_size:     4,
        epochs:         1,
        ..TrainConfig::default()
    };
    let prepared = TrainUseCase::new(cfg).prepare().unwrap();
    let cfg      = &prepared.config;

    let ckpt    = CheckpointManager::new(&cfg.checkpoint_dir);
    let metrics = MetricsLogger::new(&cfg.checkpoint_dir).unwrap();
    train_loop::<TrainBackend>(
        cfg,
        prepared.train,
        prepared.validation,
        prepared.class_weights,
        &ckpt,
        &metrics,
        Default::default(),
    )
    .unwrap();

    cfg.checkpoint_dir.clone()
}
