// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application);
// this layer only routes and prints.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, BufReader, Write};

use commands::{Commands, ExplainArgs, NormalizeArgs, PredictArgs, TrainArgs};
use crate::ml::attribution::WordScore;

#[derive(Parser, Debug)]
#[command(
    name = "tweet-sentiment",
    version = "0.1.0",
    about = "Normalise tweets, train a sentiment classifier, label test data and explain it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)     => run_train(args),
            Commands::Predict(args)   => run_predict(args),
            Commands::Explain(args)   => run_explain(args),
            Commands::Normalize(args) => run_normalize(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on '{}'", args.train_csv);
    let output_csv = args.output_csv.clone();

    let report = TrainUseCase::new(args.into()).execute()?;
    let s      = &report.summary;
    println!(
        "Training complete: {} epochs, best epoch {} (loss {:.4}){}",
        s.epochs_run,
        s.best_epoch,
        s.best_val_loss,
        if s.stopped_early { ", stopped early" } else { "" },
    );

    if let Some(n) = report.predicted {
        println!("Labelled {} rows → {}", n, output_csv);
    }
    if let Some(words) = &report.top_words {
        print_words(words, false);
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(&args.checkpoint_dir)?;
    let labels   = use_case.execute(&args.input_csv, &args.output_csv)?;
    println!("Labelled {} rows → {}", labels.len(), args.output_csv);
    Ok(())
}

fn run_explain(args: ExplainArgs) -> Result<()> {
    use crate::application::explain_use_case::ExplainUseCase;

    let use_case = ExplainUseCase::new(&args.checkpoint_dir)?;
    let words    = use_case.execute(&args.csv, args.top_k)?;
    print_words(&words, args.hide_padding);
    Ok(())
}

fn run_normalize(args: NormalizeArgs) -> Result<()> {
    use crate::data::normalizer::Normalizer;

    let normalizer = Normalizer::new()?;
    let reader: Box<dyn BufRead> = match &args.file {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("Cannot open '{path}'"))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in reader.lines() {
        let line = line?;
        if args.steps {
            let mut text = line;
            writeln!(out, "{:<18} {}", "input", text)?;
            for rule in normalizer.rules() {
                text = rule.apply(&text);
                writeln!(out, "{:<18} {}", rule.name, text)?;
            }
            writeln!(out)?;
        } else {
            writeln!(out, "{}", normalizer.normalize(&line))?;
        }
    }
    Ok(())
}

/// Lowest score first, so the strongest words end up at the bottom
fn print_words(words: &[WordScore], hide_padding: bool) {
    println!("\nMost significant words for the positive class:");
    for w in words.iter().filter(|w| !(hide_padding && w.is_sentinel())) {
        println!("  {:<20} {:>10.5}", w.word, w.score);
    }
}
