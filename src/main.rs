//! Girder binary entry point.

fn main() {
    if let Err(err) = girder::cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
