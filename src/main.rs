use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pointlane::application::scheduler::{Completion, Outcome, SchedulerConfig};
use pointlane::application::service::PointService;
use pointlane::interfaces::csv::command_reader::CommandReader;
use pointlane::interfaces::csv::outcome_writer::OutcomeWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file (`type, user, amount`)
    input: PathBuf,

    /// How long an idle user lane lingers before retiring, in milliseconds.
    #[arg(long, default_value_t = 0)]
    idle_grace_ms: u64,

    /// Wait for each command to finish before submitting the next one.
    #[arg(long)]
    sequential: bool,
}

async fn resolve(
    completion: pointlane::error::Result<Completion>,
) -> pointlane::error::Result<Outcome> {
    completion?.wait().await
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let service = PointService::in_memory(SchedulerConfig {
        idle_grace: Duration::from_millis(cli.idle_grace_ms),
    });

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);

    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());

    // Everything is enqueued before anything is awaited unless --sequential,
    // so different users' lanes overlap while each user keeps file order.
    let mut submitted = Vec::new();
    for command_result in reader.commands() {
        match command_result {
            Ok(command) => {
                let completion = service.submit(&command);
                if cli.sequential {
                    let result = resolve(completion).await;
                    writer.write_outcome(&command, &result).into_diagnostic()?;
                } else {
                    submitted.push((command, completion));
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    for (command, completion) in submitted {
        let result = resolve(completion).await;
        writer.write_outcome(&command, &result).into_diagnostic()?;
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}
