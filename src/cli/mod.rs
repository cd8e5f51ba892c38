// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and routes each
// subcommand to its use case in Layer 2. Results are printed
// here; the layers below only log.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, PredictArgs, TrainArgs};

use crate::domain::traits::SentimentClassifier;

#[derive(Parser, Debug)]
#[command(
    name = "glove-sentiment",
    version,
    about = "Train an LSTM sentiment classifier on IMDB reviews with frozen GloVe embeddings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Predict(args)  => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on reviews in: {}", args.data_dir);

    let summary = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete. test_loss={:.4} test_accuracy={:.4}",
        summary.final_eval.loss, summary.final_eval.accuracy,
    );
    if let Some(best) = summary.history.iter().find(|m| m.epoch == summary.best_epoch) {
        println!(
            "Best epoch {} of {}: val_loss={:.4} val_accuracy={:.4}",
            best.epoch, summary.history.len(), best.val_loss, best.val_acc,
        );
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let metrics = EvaluateUseCase::new(args.checkpoint_dir, args.data_dir).execute()?;
    println!(
        "test_loss={:.4} test_accuracy={:.4} ({} reviews)",
        metrics.loss, metrics.accuracy, metrics.samples,
    );
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case   = PredictUseCase::new(&args.checkpoint_dir)?;
    let prediction = use_case.classify(&args.text)?;
    println!("{} (p_positive={:.4})", prediction.sentiment, prediction.probability);
    Ok(())
}
