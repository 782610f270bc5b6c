mod diagnostics;
mod driver;
mod options;

use std::process;

use clap::Parser;

use crate::options::Cli;

fn main() {
    env_logger::init();
    let config = Cli::parse().into_config();
    let mut sources = driver::SourceMap::default();
    if let Err(err) = driver::run(&config, &mut sources) {
        diagnostics::render_error(&err, &sources);
        process::exit(1);
    }
}
