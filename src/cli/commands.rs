// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and all their flags:
//   train     — fit the classifier on a labelled CSV
//   predict   — label an unlabelled CSV
//   explain   — rank the words driving positive predictions
//   normalize — print cleaned text (normaliser debugging)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the sentiment model on a labelled CSV (id,text,label)
    Train(TrainArgs),

    /// Label an unlabelled CSV (id,text) with a trained checkpoint
    Predict(PredictArgs),

    /// Print the words that contribute most to positive predictions
    Explain(ExplainArgs),

    /// Normalise text from a file (one tweet per line) or stdin
    Normalize(NormalizeArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Labelled training CSV
    #[arg(long, default_value = "data/train.csv")]
    pub train_csv: String,

    /// Unlabelled CSV to predict after training
    #[arg(long, default_value = "data/test.csv")]
    pub test_csv: String,

    /// Where the labelled copy of the test CSV is written
    #[arg(long, default_value = "data/test_predicted.csv")]
    pub output_csv: String,

    /// Directory for checkpoints, tokenizer and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Size of the vocabulary, index 0 included
    #[arg(long, default_value_t = 10_000)]
    pub vocab_size: usize,

    /// Pad/truncate to this many tokens (default: longest tweet)
    #[arg(long)]
    pub max_seq_len: Option<usize>,

    #[arg(long, default_value_t = 300)]
    pub embedding_dim: usize,

    /// Hidden units per LSTM direction
    #[arg(long, default_value_t = 200)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Upper bound on epochs; early stopping usually ends sooner
    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Epochs without validation improvement before stopping
    #[arg(long, default_value_t = 2)]
    pub patience: usize,

    /// Fraction of the training CSV held out for validation
    #[arg(long, default_value_t = 0.25)]
    pub validation_split: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of words printed after training
    #[arg(long, default_value_t = 100)]
    pub top_words: usize,

    /// Skip predicting the test CSV after training
    #[arg(long)]
    pub skip_predict: bool,

    /// Skip the word attribution report after training
    #[arg(long)]
    pub skip_explain: bool,

    /// Discard training rows that normalise to empty text
    #[arg(long)]
    pub drop_empty: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_csv:        a.train_csv,
            test_csv:         a.test_csv,
            output_csv:       a.output_csv,
            checkpoint_dir:   a.checkpoint_dir,
            vocab_size:       a.vocab_size,
            max_seq_len:      a.max_seq_len,
            embedding_dim:    a.embedding_dim,
            hidden_size:      a.hidden_size,
            dropout:          a.dropout,
            batch_size:       a.batch_size,
            epochs:           a.epochs,
            lr:               a.lr,
            patience:         a.patience,
            validation_split: a.validation_split,
            seed:             a.seed,
            top_words:        a.top_words,
            run_predict:      !a.skip_predict,
            run_explain:      !a.skip_explain,
            drop_empty:       a.drop_empty,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Unlabelled CSV with at least id,text columns
    #[arg(long, default_value = "data/test.csv")]
    pub input_csv: String,

    #[arg(long, default_value = "data/test_predicted.csv")]
    pub output_csv: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// CSV whose tweets are scored (normally the training file)
    #[arg(long, default_value = "data/train.csv")]
    pub csv: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// How many words to print
    #[arg(long, default_value_t = 100)]
    pub top_k: usize,

    /// Leave the padding sentinel out of the listing
    #[arg(long)]
    pub hide_padding: bool,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Text file, one tweet per line. Reads stdin when omitted.
    pub file: Option<String>,

    /// Print the text after every rule, not just the final result
    #[arg(long)]
    pub steps: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["tweet-sentiment", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };

        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();
        assert_eq!(cfg.vocab_size, def.vocab_size);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.patience, def.patience);
        assert_eq!(cfg.max_seq_len, None);
        assert!(cfg.run_predict && cfg.run_explain);
    }

    #[test]
    fn test_skip_flags() {
        let cli = Cli::try_parse_from([
            "tweet-sentiment", "train", "--skip-predict", "--max-seq-len", "30",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };

        let cfg: TrainConfig = args.into();
        assert!(!cfg.run_predict);
        assert!(cfg.run_explain);
        assert_eq!(cfg.max_seq_len, Some(30));
    }

    #[test]
    fn test_normalize_file_is_optional() {
        let cli = Cli::try_parse_from(["tweet-sentiment", "normalize"]).unwrap();
        assert!(matches!(cli.command, Commands::Normalize(NormalizeArgs { file: None, steps: false })));
    }
}
