#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = lingo_cli::run_from_env() {
        eprintln!("lingo: {error}");
        std::process::exit(error.exit_code());
    }
}
