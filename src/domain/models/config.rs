use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::tokenizer::TokenizerConfig;
use crate::infrastructure::config::{ConfigError, ConfigLoader, Override};

/// Hyperparameters of one training run.
///
/// Every group falls back to its documented default when absent from the
/// document. Instances are never mutated after loading; overrides build a
/// new value through the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrainingConfig {
    /// Run identifier, must be non-empty
    #[serde(default = "default_name")]
    pub name: String,

    /// Output directory of the run (checkpoints, traces, metrics)
    #[serde(default)]
    pub dump_dir: String,

    /// Total optimizer steps
    #[serde(default = "default_steps")]
    pub steps: u64,

    /// Interval in steps at which diagnostics are sampled; 0 disables probing
    #[serde(default)]
    pub probe_freq: u64,

    /// Global random seed
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Micro-batches accumulated per optimizer step
    #[serde(default = "default_grad_acc_steps")]
    pub grad_acc_steps: u64,

    /// Interval in steps between explicit garbage collections
    #[serde(default = "default_gc_collect_freq")]
    pub gc_collect_freq: u64,

    /// Optimizer and learning-rate schedule
    #[serde(default)]
    pub optim: OptimConfig,

    /// Parallelism and numeric settings
    #[serde(default)]
    pub distributed: DistributedConfig,

    /// Model dimensions
    #[serde(default)]
    pub model: ModelConfig,

    /// Data loading
    #[serde(default)]
    pub data: DataConfig,

    /// Profiler settings
    #[serde(default)]
    pub profiling: ProfilingConfig,

    /// Checkpoint cadence
    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    /// Metric logging cadence
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_name() -> String {
    "lingua".to_string()
}

const fn default_steps() -> u64 {
    1000
}

const fn default_seed() -> u64 {
    42
}

const fn default_grad_acc_steps() -> u64 {
    1
}

const fn default_gc_collect_freq() -> u64 {
    1000
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            dump_dir: String::new(),
            steps: default_steps(),
            probe_freq: 0,
            seed: default_seed(),
            grad_acc_steps: default_grad_acc_steps(),
            gc_collect_freq: default_gc_collect_freq(),
            optim: OptimConfig::default(),
            distributed: DistributedConfig::default(),
            model: ModelConfig::default(),
            data: DataConfig::default(),
            profiling: ProfilingConfig::default(),
            checkpoint: CheckpointConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Serialize back to the YAML document format.
    ///
    /// Loading the returned text yields a config equal to `self`.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// A copy of this config with one value replaced and re-validated.
    pub fn with_override(&self, o: &Override) -> Result<Self, ConfigError> {
        ConfigLoader::apply_override(self, o)
    }

    /// Whether diagnostic probing is enabled.
    pub const fn probing_enabled(&self) -> bool {
        self.probe_freq > 0
    }
}

/// Learning-rate schedule shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheduler {
    Constant,
    Linear,
    InvSqrt,
    #[default]
    Cosine,
}

impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Constant => "constant",
            Self::Linear => "linear",
            Self::InvSqrt => "inv_sqrt",
            Self::Cosine => "cosine",
        };
        f.write_str(s)
    }
}

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimConfig {
    /// Peak learning rate (> 0)
    #[serde(default = "default_lr")]
    pub lr: f64,

    /// Steps of linear warmup, at most `steps`
    #[serde(default = "default_warmup")]
    pub warmup: u64,

    /// Final learning rate as a fraction of `lr`, in [0, 1]
    #[serde(default = "default_lr_min_ratio")]
    pub lr_min_ratio: f64,

    /// Gradient norm clipping threshold (> 0)
    #[serde(default = "default_clip")]
    pub clip: f64,

    /// Decoupled weight decay
    #[serde(default = "default_weight_decay")]
    pub weight_decay: f64,

    #[serde(default = "default_beta1")]
    pub beta1: f64,

    #[serde(default = "default_beta2")]
    pub beta2: f64,

    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Schedule applied after warmup
    #[serde(default)]
    pub scheduler: Scheduler,
}

const fn default_lr() -> f64 {
    3e-4
}

const fn default_warmup() -> u64 {
    100
}

const fn default_lr_min_ratio() -> f64 {
    0.1
}

const fn default_clip() -> f64 {
    1.0
}

const fn default_weight_decay() -> f64 {
    0.1
}

const fn default_beta1() -> f64 {
    0.9
}

const fn default_beta2() -> f64 {
    0.95
}

const fn default_epsilon() -> f64 {
    1e-8
}

impl Default for OptimConfig {
    fn default() -> Self {
        Self {
            lr: default_lr(),
            warmup: default_warmup(),
            lr_min_ratio: default_lr_min_ratio(),
            clip: default_clip(),
            weight_decay: default_weight_decay(),
            beta1: default_beta1(),
            beta2: default_beta2(),
            epsilon: default_epsilon(),
            scheduler: Scheduler::default(),
        }
    }
}

/// Sharding strategy name handed to the training program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FsdpType {
    #[default]
    NoShard,
    FullShard,
}

impl fmt::Display for FsdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoShard => f.write_str("no_shard"),
            Self::FullShard => f.write_str("full_shard"),
        }
    }
}

/// Parameter dtype
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelDtype {
    #[default]
    Bf16,
    Fp16,
    Fp32,
}

impl fmt::Display for ModelDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bf16 => "bf16",
            Self::Fp16 => "fp16",
            Self::Fp32 => "fp32",
        };
        f.write_str(s)
    }
}

/// Distributed training configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DistributedConfig {
    #[serde(default)]
    pub fsdp_type: FsdpType,

    /// Compile the model before training
    #[serde(default)]
    pub compile: bool,

    #[serde(default)]
    pub model_dtype: ModelDtype,

    #[serde(default)]
    pub matmul_allow_tf32: bool,

    #[serde(default)]
    pub selective_activation_checkpointing: bool,

    /// Tensor-parallel group size (> 0)
    #[serde(default = "default_parallel_degree")]
    pub tp_size: u64,

    /// Data-parallel shard group size (> 0)
    #[serde(default = "default_parallel_degree")]
    pub dp_shard: u64,

    /// Data-parallel replica group size (> 0)
    #[serde(default = "default_parallel_degree")]
    pub dp_replicate: u64,
}

const fn default_parallel_degree() -> u64 {
    1
}

impl Default for DistributedConfig {
    fn default() -> Self {
        Self {
            fsdp_type: FsdpType::default(),
            compile: false,
            model_dtype: ModelDtype::default(),
            matmul_allow_tf32: false,
            selective_activation_checkpointing: false,
            tp_size: default_parallel_degree(),
            dp_shard: default_parallel_degree(),
            dp_replicate: default_parallel_degree(),
        }
    }
}

impl DistributedConfig {
    /// Number of ranks the parallelism layout expects.
    pub const fn world_size(&self) -> u64 {
        self.dp_replicate
            .saturating_mul(self.dp_shard)
            .saturating_mul(self.tp_size)
    }
}

/// Model dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelConfig {
    #[serde(default = "default_dim")]
    pub dim: u64,

    #[serde(default = "default_n_layers")]
    pub n_layers: u64,

    #[serde(default = "default_n_heads")]
    pub n_heads: u64,

    /// Key/value heads for grouped-query attention; `None` means `n_heads`
    #[serde(default)]
    pub n_kv_heads: Option<u64>,

    #[serde(default = "default_vocab_size")]
    pub vocab_size: u64,

    #[serde(default = "default_norm_eps")]
    pub norm_eps: f64,

    #[serde(default = "default_rope_theta")]
    pub rope_theta: f64,

    /// Longest sequence the positional encoding is built for
    #[serde(default = "default_max_seqlen")]
    pub max_seqlen: u64,
}

const fn default_dim() -> u64 {
    512
}

const fn default_n_layers() -> u64 {
    8
}

const fn default_n_heads() -> u64 {
    8
}

const fn default_vocab_size() -> u64 {
    258
}

const fn default_norm_eps() -> f64 {
    1e-5
}

const fn default_rope_theta() -> f64 {
    10_000.0
}

const fn default_max_seqlen() -> u64 {
    1024
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dim: default_dim(),
            n_layers: default_n_layers(),
            n_heads: default_n_heads(),
            n_kv_heads: None,
            vocab_size: default_vocab_size(),
            norm_eps: default_norm_eps(),
            rope_theta: default_rope_theta(),
            max_seqlen: default_max_seqlen(),
        }
    }
}

impl ModelConfig {
    /// Per-head dimension, if `dim` splits evenly across heads.
    pub const fn head_dim(&self) -> Option<u64> {
        if self.n_heads == 0 || self.dim % self.n_heads != 0 {
            None
        } else {
            Some(self.dim / self.n_heads)
        }
    }
}

/// Data loading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DataConfig {
    /// Directory holding the source shards; never opened by the loader
    #[serde(default = "default_root_dir")]
    pub root_dir: String,

    /// Sampling weight per source; weights need not sum to 1
    #[serde(default)]
    pub sources: BTreeMap<String, f64>,

    #[serde(default = "default_batch_size")]
    pub batch_size: u64,

    #[serde(default = "default_prefetch_size")]
    pub prefetch_size: u64,

    #[serde(default = "default_seq_len")]
    pub seq_len: u64,

    #[serde(default = "default_n_views")]
    pub n_views: u64,

    #[serde(default = "default_true")]
    pub load_async: bool,

    #[serde(default = "default_true")]
    pub add_bos: bool,

    #[serde(default = "default_true")]
    pub add_eos: bool,

    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

fn default_root_dir() -> String {
    "data".to_string()
}

const fn default_batch_size() -> u64 {
    2
}

const fn default_prefetch_size() -> u64 {
    64
}

const fn default_seq_len() -> u64 {
    2048
}

const fn default_n_views() -> u64 {
    2
}

const fn default_true() -> bool {
    true
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            sources: BTreeMap::new(),
            batch_size: default_batch_size(),
            prefetch_size: default_prefetch_size(),
            seq_len: default_seq_len(),
            n_views: default_n_views(),
            load_async: true,
            add_bos: true,
            add_eos: true,
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl DataConfig {
    /// Sum of all source weights.
    pub fn total_weight(&self) -> f64 {
        self.sources.values().sum()
    }
}

/// Profiler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfilingConfig {
    #[serde(default)]
    pub run: bool,

    /// Folder under `dump_dir` receiving traces
    #[serde(default = "default_trace_folder")]
    pub trace_folder: String,

    #[serde(default = "default_mem_warmup")]
    pub mem_warmup: u64,

    #[serde(default = "default_profile_window")]
    pub mem_steps: u64,

    #[serde(default = "default_profile_warmup")]
    pub profile_warmup: u64,

    #[serde(default = "default_profile_window")]
    pub profile_steps: u64,
}

fn default_trace_folder() -> String {
    "profiling".to_string()
}

const fn default_mem_warmup() -> u64 {
    100
}

const fn default_profile_warmup() -> u64 {
    102
}

const fn default_profile_window() -> u64 {
    2
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            run: false,
            trace_folder: default_trace_folder(),
            mem_warmup: default_mem_warmup(),
            mem_steps: default_profile_window(),
            profile_warmup: default_profile_warmup(),
            profile_steps: default_profile_window(),
        }
    }
}

/// Cadence and retention for one kind of checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SaveEvery {
    /// Interval in steps (> 0)
    #[serde(default = "default_save_every")]
    pub every: u64,

    /// Number of most recent checkpoints kept (> 0)
    #[serde(default = "default_keep")]
    pub keep: u64,
}

const fn default_save_every() -> u64 {
    1000
}

const fn default_keep() -> u64 {
    1
}

impl Default for SaveEvery {
    fn default() -> Self {
        Self {
            every: default_save_every(),
            keep: default_keep(),
        }
    }
}

/// Checkpoint configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckpointConfig {
    /// Full training-state dumps
    #[serde(default)]
    pub dump: SaveEvery,

    /// Weights-only checkpoints for evaluation
    #[serde(default)]
    pub eval: SaveEvery,

    #[serde(default)]
    pub path: Option<String>,

    /// Checkpoint to initialize weights from
    #[serde(default)]
    pub init_ckpt_path: Option<String>,
}

/// Metric logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Interval in steps between metric records (> 0)
    #[serde(default = "default_log_freq")]
    pub freq: u64,

    /// Interval in steps between accumulated-metric records
    #[serde(default)]
    pub acc_freq: Option<u64>,
}

const fn default_log_freq() -> u64 {
    10
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            freq: default_log_freq(),
            acc_freq: None,
        }
    }
}
