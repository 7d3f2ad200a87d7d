use std::process::ExitCode;

use chart_template::{cli, config::Variant};

fn main() -> ExitCode {
    cli::run(Variant::Chart)
}
