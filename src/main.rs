use std::{error::Error, process, sync::Arc};

use clap::Parser;
use tracing::info;

use philosophers::logging;
use philosophers::philosopher::{run_tasks, run_threads};
use philosophers::signal::spawn_reporter;
use philosophers::{AsyncTable, Config, DurationRange, Runtime, Table};

#[derive(Parser)]
#[command(name = "philosophers")]
#[command(version)]
#[command(about = "Dining philosophers solved with a monitor")]
struct Cli {
    /// Number of philosophers around the table
    #[arg(short = 'n', long, env = "PHILOSOPHERS", default_value_t = 5)]
    philosophers: usize,

    /// Minimum thinking time (ms)
    #[arg(long, default_value_t = 2000)]
    think_min: u64,

    /// Maximum thinking time (ms)
    #[arg(long, default_value_t = 3000)]
    think_max: u64,

    /// Minimum eating time (ms)
    #[arg(long, default_value_t = 2000)]
    eat_min: u64,

    /// Maximum eating time (ms)
    #[arg(long, default_value_t = 3000)]
    eat_max: u64,

    /// Meals per philosopher before exiting. Runs forever when omitted
    #[arg(long)]
    rounds: Option<u64>,

    /// Run philosophers on OS threads or on tokio tasks
    #[arg(long, value_enum, default_value_t = Runtime::Threads)]
    runtime: Runtime,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            philosophers: self.philosophers,
            think: DurationRange::new(self.think_min, self.think_max),
            eat: DurationRange::new(self.eat_min, self.eat_max),
            rounds: self.rounds,
            runtime: self.runtime,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let config = cli.config();
    config.validate()?;

    info!(
        pid = process::id(),
        philosophers = config.philosophers,
        runtime = ?config.runtime,
        "starting"
    );

    let snapshot = match config.runtime {
        Runtime::Threads => {
            let table = Arc::new(Table::new(config.philosophers));
            let table0 = table.clone();
            spawn_reporter(move || table0.snapshot())?;
            run_threads(table, &config)?
        }
        Runtime::Tokio => {
            let table = Arc::new(AsyncTable::new(config.philosophers));
            let table0 = table.clone();
            spawn_reporter(move || table0.snapshot())?;
            let rt = tokio::runtime::Runtime::new().map_err(philosophers::Error::Runtime)?;
            rt.block_on(run_tasks(table, &config))?
        }
    };

    info!(table = %snapshot, "finished");
    Ok(())
}
