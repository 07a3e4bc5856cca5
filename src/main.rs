fn main() {
    if let Err(err) = catalog_diff::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
