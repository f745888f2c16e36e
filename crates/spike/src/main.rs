use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use paddle_brain_core::{
    full_grid, load, load_or_train, Activation, ModelSource, Network, PaddleController, Sample,
    TrainConfig, GRID,
};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "paddle-brain", about = "Train and run the paddle-tracking network")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train the model (or reuse a valid stored one) and persist it on convergence.
    Train(RunArgs),
    /// Evaluate the stored model over the full 1024-pattern enumeration.
    Eval(RunArgs),
    /// Time forward passes over the full enumeration.
    Bench {
        #[command(flatten)]
        args: RunArgs,
        /// Sweeps over the 1024 patterns to time.
        #[arg(long, default_value_t = 100)]
        rounds: usize,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path of the persisted model.
    #[arg(long, default_value = "paddle-model.json")]
    model: PathBuf,
    /// Weight-initialization seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Online SGD step size.
    #[arg(long)]
    learning_rate: Option<f32>,
    /// Hard cap on training epochs.
    #[arg(long)]
    max_epochs: Option<usize>,
    /// Epochs before the convergence sweep starts.
    #[arg(long)]
    warmup_epochs: Option<usize>,
    /// Use sigmoid instead of tanh.
    #[arg(long)]
    sigmoid: bool,
    /// Hidden layer widths between the 1024-wide input and the scalar output,
    /// comma-separated. Empty for the direct [1024, 1] model.
    #[arg(long, value_delimiter = ',')]
    hidden: Vec<usize>,
}

impl RunArgs {
    fn config(&self) -> anyhow::Result<TrainConfig> {
        let mut cfg = TrainConfig::default();
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(lr) = self.learning_rate {
            cfg.learning_rate = lr;
        }
        if let Some(cap) = self.max_epochs {
            cfg.max_epochs = cap;
        }
        if let Some(warmup) = self.warmup_epochs {
            cfg.warmup_epochs = warmup;
        }
        if self.sigmoid {
            cfg.activation = Activation::Sigmoid;
        }
        cfg.validate().context("invalid training configuration")?;
        Ok(cfg)
    }

    fn network(&self, cfg: &TrainConfig) -> anyhow::Result<Network> {
        let mut sizes = Vec::with_capacity(self.hidden.len() + 2);
        sizes.push(GRID * GRID);
        sizes.extend_from_slice(&self.hidden);
        sizes.push(1);

        let mut rng = ChaCha12Rng::seed_from_u64(cfg.seed);
        Network::new(&sizes, cfg.activation, &mut rng).context("invalid layer topology")
    }
}

fn accuracy(network: &Network, samples: &[Sample]) -> anyhow::Result<usize> {
    let mut hits = 0;
    for s in samples {
        let out = network.forward(&s.input)?;
        if (out[0] * GRID as f32).round() as i64 == s.class as i64 {
            hits += 1;
        }
    }
    Ok(hits)
}

fn cmd_train(args: &RunArgs) -> anyhow::Result<()> {
    let cfg = args.config()?;
    let mut network = args.network(&cfg)?;
    let samples = full_grid();

    let start = Instant::now();
    let source = load_or_train(&mut network, &args.model, &samples, &cfg)?;
    let elapsed = start.elapsed();

    match source {
        ModelSource::Loaded => {
            println!("Loaded stored model {} in {:?}", args.model.display(), elapsed);
        }
        ModelSource::Trained(run) => {
            println!(
                "Trained for {} epochs in {:?} (converged: {})",
                run.epochs, elapsed, run.converged
            );
            if run.converged {
                println!("Model persisted to {}", args.model.display());
            } else {
                println!("Epoch cap reached; unconverged model NOT persisted");
            }
        }
    }

    let hits = accuracy(&network, &samples)?;
    println!("Accuracy: {}/{} patterns", hits, samples.len());
    Ok(())
}

fn cmd_eval(args: &RunArgs) -> anyhow::Result<()> {
    let cfg = args.config()?;
    let mut network = args.network(&cfg)?;
    if !load(&mut network, &args.model) {
        bail!(
            "no usable model at {} (missing, corrupt, or topology mismatch); run `paddle-brain train` first",
            args.model.display()
        );
    }

    let samples = full_grid();
    let hits = accuracy(&network, &samples)?;
    println!("Accuracy: {}/{} patterns", hits, samples.len());

    // Small control-loop trace: ball sweeping across the top row.
    let controller = PaddleController::default();
    let mut paddle = 0;
    print!("Paddle trace:");
    for col in (0..GRID).step_by(4) {
        let pattern = paddle_brain_core::one_hot(0, col);
        let out = network.forward(&pattern)?;
        paddle = controller.step_toward(paddle, controller.target_column(out[0]));
        print!(" {}", paddle);
    }
    println!();
    Ok(())
}

fn cmd_bench(args: &RunArgs, rounds: usize) -> anyhow::Result<()> {
    let cfg = args.config()?;
    let network = args.network(&cfg)?;
    let samples = full_grid();

    let start = Instant::now();
    let mut sink = 0.0f32;
    for _ in 0..rounds {
        for s in &samples {
            sink += network.forward(&s.input)?[0];
        }
    }
    let elapsed = start.elapsed();
    let passes = rounds * samples.len();

    println!("{} forward passes in {:?} (checksum {})", passes, elapsed, sink);
    println!("Avg per pattern: {:?}", elapsed / passes as u32);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Train(args) => cmd_train(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Bench { args, rounds } => cmd_bench(args, *rounds),
    }
}
