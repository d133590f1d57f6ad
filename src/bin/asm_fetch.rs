use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use assembly_batch_fetcher::app::{App, BatchResult, FetchConfig};
use assembly_batch_fetcher::datasets::{DatasetsClient, SystemDatasetsClient};
use assembly_batch_fetcher::error::FetchError;
use assembly_batch_fetcher::output::ConsoleProgress;

#[derive(Parser)]
#[command(name = "asm-fetch")]
#[command(about = "Batch downloader for NCBI genome assemblies")]
#[command(version, author)]
struct Cli {
    #[arg(
        short,
        long,
        help = "Text file of assembly accessions, one per line after a header line"
    )]
    input: Utf8PathBuf,

    #[arg(short, long, help = "Destination directory; created if absent")]
    output: Utf8PathBuf,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(fetch) = report.downcast_ref::<FetchError>() {
            return ExitCode::from(map_exit_code(fetch));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &FetchError) -> u8 {
    match error {
        FetchError::ManifestRead(_) | FetchError::InvalidGenomeAccession(_) => 2,
        FetchError::MissingTool(_) | FetchError::ToolInvocation(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FetchConfig {
        input: cli.input,
        output: cli.output,
    };

    let client = SystemDatasetsClient::new();
    if let Some(version) = client.tool_info().datasets {
        tracing::info!(version = %version, "datasets CLI");
    }

    let app = App::new(client);
    let result = app.run(&config, &ConsoleProgress)?;
    print_summary(&result);
    Ok(())
}

fn print_summary(result: &BatchResult) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}asm-fetch summary{reset}");
    println!("Download process finished. Input file moved to the output directory.");
    if result.failed == 0 {
        println!("{green}All files were downloaded successfully.{reset}");
    } else {
        println!(
            "{yellow}{} errors occurred during the download process. {} files were downloaded.{reset}",
            result.failed,
            result.succeeded()
        );
    }
}
