use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = buried_report_loader::cli::run_from_env() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
