use clap::Parser;
use report_parser::cli::{self, Args};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    cli::setup_logging(&args);

    match cli::run(&args) {
        Ok(stats) => {
            // Summary has already been reported; a run where every file
            // failed still counts as an error
            if stats.files_discovered > 0 && stats.files_processed == 0 {
                eprintln!("Error: none of the {} files could be converted", stats.files_discovered);
                process::exit(1);
            }
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
