use std::thread;

use dual_sink_log::cli::{build_cli, load_config, parse_options};
use dual_sink_log::{log_debug, log_info, log_warn};

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    let opts = parse_options(&matches);

    let config = match load_config(&opts) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if opts.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // Panics if ./logs or the day's file cannot be opened
    let logger = dual_sink_log::init_with_config(&opts.module, &opts.base, &config);

    log_info!(
        logger,
        version = dual_sink_log::internal::config::VERSION,
        threads = opts.threads,
        count = opts.count,
        "starting"
    );
    if let Some(path) = logger.file_path() {
        log_debug!(logger, path = %path.display(), "log file opened");
    }

    let handles: Vec<_> = (0..opts.threads)
        .map(|worker| {
            let count = opts.count;
            thread::spawn(move || {
                let logger = dual_sink_log::global();
                for seq in 0..count {
                    log_info!(logger, worker, seq, "tick");
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            log_warn!(logger, "worker thread panicked");
        }
    }

    dual_sink_log::execute_and_log_error(|| {
        std::fs::metadata("./definitely-missing").map(|_| ())
    });

    log_info!(logger, "done");

    if let Err(e) = dual_sink_log::sync() {
        eprintln!("Failed to flush logs: {}", e);
    }

    Ok(())
}
