fn main() {
    env_logger::init();

    if let Err(error) = vole_state::run_cli() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
