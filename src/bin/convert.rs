use clap::Parser;
use std::process;

use tarot_kit::args::ConvertArgs;
use tarot_kit::convert::cli::run;
use tarot_kit::logging::setup_logging;

fn main() {
    let args = match ConvertArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Usage errors exit 1; --help and --version exit 0
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    setup_logging();

    if let Err(e) = run(&args) {
        log::error!("❌ {}", e);
        log::error!("Usage: tarot-convert <INPUT> [OUTPUT] [--test]");
        process::exit(1);
    }
}
