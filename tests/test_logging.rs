use chatlens::logging;

#[test]
fn test_init_with_log_dir_creates_file() -> anyhow::Result<()> {
    let test_dir = tempfile::tempdir()?;
    let log_dir = test_dir.path().join("logs");

    logging::init(Some(&log_dir))?;

    tracing::info!("logging smoke test");
    tracing::warn!("logging smoke warning");

    // Give the appender a moment to flush
    std::thread::sleep(std::time::Duration::from_millis(100));

    assert!(log_dir.exists());
    let log_file = log_dir.join("chatlens.log");
    if log_file.exists() {
        let contents = std::fs::read_to_string(&log_file)?;
        assert!(contents.contains("logging smoke test"));
    }

    // A second init must not fail even though a subscriber is installed
    logging::init(None)?;

    Ok(())
}
