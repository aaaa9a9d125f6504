use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Each `-v` shows one more level: the default narrates copies, moves and
/// skips; `-v` adds the date field picked and file hashes; `-vv` dumps what
/// exiftool printed.
pub fn configure_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(buf, "{style}{}{style:#}\t{}", record.level(), record.args())
        })
        .init();
}
