use callkit_logger::{LevelFilter, Logger};

#[test]
fn console_only_logger_has_no_file_sink() {
    let logger = Logger::builder()
        .name("integration-console-only")
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(!logger.has_file_sink());
}
