fn main() {
    if let Err(err) = bankchat::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}
