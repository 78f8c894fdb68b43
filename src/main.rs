use ardap_extract::{ArdapExtract, Cli, UserFriendlyError};
use clap::error::ErrorKind;
use clap::Parser;
use std::process;

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return handle_parse_error(e),
    };

    let extractor = ArdapExtract::from_cli(&cli);

    if let Err(e) = cli.validate_input_dir() {
        extractor.handle_error(&e);
        return 1;
    }

    match extractor.run(&cli.input_dir, &cli.output_tsv) {
        Ok(summary) => {
            extractor.print_summary(&summary);
            0
        }
        Err(e) => {
            extractor.handle_error(&e);
            1
        }
    }
}

/// Missing positional arguments get the short usage line on stdout and exit
/// code 1; --help and --version keep clap's normal behavior.
fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            0
        }
        ErrorKind::MissingRequiredArgument => {
            println!("Usage: ardap-extract <INPUT_DIR> <OUTPUT_TSV>");
            1
        }
        _ => {
            let _ = error.print();
            1
        }
    }
}
