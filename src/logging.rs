use std::io::Write;

/// Timestamped `env_logger` output, `info` unless `RUST_LOG` says otherwise.
pub fn init() {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();
}
