use std::io;

const OWN_TARGETS: [&str; 2] = ["flyhigh", "flyhigh_data"];

/// Stdout logging: dependencies at `Warn`, this app at `Debug` in debug
/// builds and `Info` otherwise.
pub fn setup(is_debug: bool) -> Result<(), log::SetLoggerError> {
    let own_level = if is_debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(log::LevelFilter::Warn);

    for target in OWN_TARGETS {
        dispatch = dispatch.level_for(target, own_level);
    }

    dispatch.chain(io::stdout()).apply()
}
