pub mod cli;
pub mod codec;
pub mod model;
pub mod runtime;
pub mod store;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
