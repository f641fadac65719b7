//! Domain and cross-field checks for [`TrainingConfig`].

use std::fmt::Display;

use super::error::ConfigError;
use crate::domain::models::TrainingConfig;

/// Validate configuration after extraction.
///
/// Returns the first violation found, naming its key path.
pub fn validate(config: &TrainingConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::validation("name", "must not be empty"));
    }

    validate_optim(config)?;
    validate_distributed(config)?;
    validate_model(config)?;
    validate_data(config)?;

    if config.profiling.trace_folder.trim().is_empty() {
        return Err(ConfigError::validation(
            "profiling.trace_folder",
            "must not be empty",
        ));
    }

    ensure_positive("checkpoint.dump.every", config.checkpoint.dump.every)?;
    ensure_positive("checkpoint.dump.keep", config.checkpoint.dump.keep)?;
    ensure_positive("checkpoint.eval.every", config.checkpoint.eval.every)?;
    ensure_positive("checkpoint.eval.keep", config.checkpoint.eval.keep)?;

    ensure_positive("logging.freq", config.logging.freq)?;
    if let Some(acc_freq) = config.logging.acc_freq {
        ensure_positive("logging.acc_freq", acc_freq)?;
    }

    Ok(())
}

/// Non-fatal observations about a valid configuration.
pub fn warnings(config: &TrainingConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.model.head_dim().is_none() {
        warnings.push(format!(
            "model.dim ({}) is not divisible by model.n_heads ({})",
            config.model.dim, config.model.n_heads
        ));
    }

    if config.data.sources.is_empty() {
        warnings.push("data.sources is empty; no data will be sampled".to_string());
    } else if config.data.total_weight() == 0.0 {
        warnings.push("data.sources weights are all zero".to_string());
    }

    if config.data.seq_len > config.model.max_seqlen {
        warnings.push(format!(
            "data.seq_len ({}) exceeds model.max_seqlen ({})",
            config.data.seq_len, config.model.max_seqlen
        ));
    }

    warnings
}

fn validate_optim(config: &TrainingConfig) -> Result<(), ConfigError> {
    let optim = &config.optim;

    ensure_positive_f64("optim.lr", optim.lr)?;
    if optim.warmup > config.steps {
        return Err(ConfigError::validation(
            "optim.warmup",
            format!("({}) exceeds steps ({})", optim.warmup, config.steps),
        ));
    }
    ensure_unit_interval("optim.lr_min_ratio", optim.lr_min_ratio)?;
    ensure_positive_f64("optim.clip", optim.clip)?;
    if !optim.weight_decay.is_finite() || optim.weight_decay < 0.0 {
        return Err(ConfigError::validation(
            "optim.weight_decay",
            format!("({}) must be non-negative", optim.weight_decay),
        ));
    }
    ensure_beta("optim.beta1", optim.beta1)?;
    ensure_beta("optim.beta2", optim.beta2)?;
    ensure_positive_f64("optim.epsilon", optim.epsilon)?;

    ensure_positive("grad_acc_steps", config.grad_acc_steps)?;
    Ok(())
}

fn validate_distributed(config: &TrainingConfig) -> Result<(), ConfigError> {
    let distributed = &config.distributed;

    ensure_positive("distributed.tp_size", distributed.tp_size)?;
    ensure_positive("distributed.dp_shard", distributed.dp_shard)?;
    ensure_positive("distributed.dp_replicate", distributed.dp_replicate)?;

    if config.probing_enabled() {
        if distributed.tp_size != 1 {
            return Err(ConfigError::validation(
                "distributed.tp_size",
                format!(
                    "({}) must be 1 when probing is enabled (probe_freq = {})",
                    distributed.tp_size, config.probe_freq
                ),
            ));
        }
        if distributed.selective_activation_checkpointing {
            return Err(ConfigError::validation(
                "distributed.selective_activation_checkpointing",
                format!(
                    "must be false when probing is enabled (probe_freq = {})",
                    config.probe_freq
                ),
            ));
        }
    }

    Ok(())
}

fn validate_model(config: &TrainingConfig) -> Result<(), ConfigError> {
    let model = &config.model;

    ensure_positive("model.dim", model.dim)?;
    ensure_positive("model.n_layers", model.n_layers)?;
    ensure_positive("model.n_heads", model.n_heads)?;
    ensure_positive("model.vocab_size", model.vocab_size)?;
    ensure_positive("model.max_seqlen", model.max_seqlen)?;
    ensure_positive_f64("model.norm_eps", model.norm_eps)?;
    ensure_positive_f64("model.rope_theta", model.rope_theta)?;

    if let Some(n_kv_heads) = model.n_kv_heads {
        ensure_positive("model.n_kv_heads", n_kv_heads)?;
        if model.n_heads % n_kv_heads != 0 {
            return Err(ConfigError::validation(
                "model.n_kv_heads",
                format!(
                    "({n_kv_heads}) must divide model.n_heads ({})",
                    model.n_heads
                ),
            ));
        }
    }

    let tokenizer = config.data.tokenizer.name;
    if let Some(required) = tokenizer.fixed_vocab_size() {
        if model.vocab_size < required {
            return Err(ConfigError::validation(
                "model.vocab_size",
                format!(
                    "({}) is smaller than the {tokenizer} tokenizer vocabulary ({required})",
                    model.vocab_size
                ),
            ));
        }
    }

    Ok(())
}

fn validate_data(config: &TrainingConfig) -> Result<(), ConfigError> {
    let data = &config.data;

    if data.root_dir.trim().is_empty() {
        return Err(ConfigError::validation("data.root_dir", "must not be empty"));
    }

    for (source, weight) in &data.sources {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ConfigError::validation(
                format!("data.sources.{source}"),
                format!("({weight}) must be a non-negative weight"),
            ));
        }
    }

    ensure_positive("data.batch_size", data.batch_size)?;
    ensure_positive("data.prefetch_size", data.prefetch_size)?;
    ensure_positive("data.seq_len", data.seq_len)?;
    ensure_positive("data.n_views", data.n_views)?;

    let tokenizer = &data.tokenizer;
    let has_path = tokenizer
        .path
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    if tokenizer.name.requires_model_file() && !has_path {
        return Err(ConfigError::validation(
            "data.tokenizer.path",
            format!("is required by the {} tokenizer", tokenizer.name),
        ));
    }

    Ok(())
}

fn ensure_positive(key_path: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(positive_error(key_path, value));
    }
    Ok(())
}

fn ensure_positive_f64(key_path: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(positive_error(key_path, value));
    }
    Ok(())
}

fn ensure_unit_interval(key_path: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::validation(
            key_path,
            format!("({value}) must be within [0, 1]"),
        ));
    }
    Ok(())
}

fn ensure_beta(key_path: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..1.0).contains(&value) {
        return Err(ConfigError::validation(
            key_path,
            format!("({value}) must be within [0, 1)"),
        ));
    }
    Ok(())
}

fn positive_error(key_path: &str, value: impl Display) -> ConfigError {
    ConfigError::validation(key_path, format!("({value}) must be positive"))
}
