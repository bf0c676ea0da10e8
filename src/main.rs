fn main() {
    #[cfg(feature = "cli")]
    weave::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("weave: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
