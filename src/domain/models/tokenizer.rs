//! Tokenizer selection for the data pipeline.
//!
//! Only the name and model-file location are configured here; encoding is
//! done by the training program. What the loader does know is which
//! tokenizers need a model file and which have a fixed vocabulary, so those
//! constraints can be checked without opening anything.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte values plus BOS and EOS.
pub const BYTES_VOCAB_SIZE: u64 = 258;

/// Raw byte ids with no specials.
pub const MOCK_VOCAB_SIZE: u64 = 256;

/// 20 standard amino acids plus BOS, EOS, UNK and PAD.
pub const AMINO_ACID_VOCAB_SIZE: u64 = 24;

/// Tokenizer implementation understood by the training program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// UTF-8 bytes
    #[default]
    Bytes,
    /// Identity mapping, for tests
    Mock,
    /// SentencePiece model file
    Sp,
    /// tiktoken BPE ranks file
    Tiktoken,
    /// Single-letter amino-acid codes
    Aa,
}

impl TokenizerKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 5] = [Self::Bytes, Self::Mock, Self::Sp, Self::Tiktoken, Self::Aa];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::Mock => "mock",
            Self::Sp => "sp",
            Self::Tiktoken => "tiktoken",
            Self::Aa => "aa",
        }
    }

    /// Whether the tokenizer is built from a model file given by `path`.
    pub const fn requires_model_file(self) -> bool {
        matches!(self, Self::Sp | Self::Tiktoken)
    }

    /// Vocabulary size when it does not depend on a model file.
    pub const fn fixed_vocab_size(self) -> Option<u64> {
        match self {
            Self::Bytes => Some(BYTES_VOCAB_SIZE),
            Self::Mock => Some(MOCK_VOCAB_SIZE),
            Self::Aa => Some(AMINO_ACID_VOCAB_SIZE),
            Self::Sp | Self::Tiktoken => None,
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokenizer configuration (`data.tokenizer`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenizerConfig {
    #[serde(default)]
    pub name: TokenizerKind,

    /// Model file for `sp` and `tiktoken`; never opened by the loader
    #[serde(default)]
    pub path: Option<String>,
}
