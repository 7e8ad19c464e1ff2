fn main() {
    if let Err(err) = mindtree_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
