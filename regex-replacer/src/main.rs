// regex-replacer/src/main.rs
//! regex-replacer entry point.

use clap::Parser;

use regex_replacer::cli::Cli;
use regex_replacer::commands::replace::error_msg;
use regex_replacer::logger;

fn main() {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug, cli.disable_debug));

    if let Err(e) = regex_replacer::run(cli) {
        error_msg(format!("{:#}", e));
        std::process::exit(1);
    }
}
