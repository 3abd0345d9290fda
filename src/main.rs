fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up logging; RUST_LOG controls verbosity
    env_logger::init();

    // Model calls are spawned onto this runtime from the UI thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    code_canvas::run_app()?;
    Ok(())
}
