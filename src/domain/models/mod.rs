pub mod config;
pub mod tokenizer;

pub use config::{
    CheckpointConfig, DataConfig, DistributedConfig, FsdpType, LoggingConfig, ModelConfig,
    ModelDtype, OptimConfig, ProfilingConfig, SaveEvery, Scheduler, TrainingConfig,
};
pub use tokenizer::{TokenizerConfig, TokenizerKind};
