use dual_sink_log::internal::logger::mock::CaptureWriter;
use dual_sink_log::{log_error, log_info, log_warn, Logger, LoggingConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::Value;
    use std::fs;
    use std::io::Write;
    use tempfile::{Builder, TempDir};
    use tracing_subscriber::fmt::writer::BoxMakeWriter;

    /// A consumer that receives its logger instead of reaching for a global
    struct PaymentService {
        logger: Logger,
    }

    impl PaymentService {
        fn charge(&self, cents: u64) -> Result<u64, String> {
            if cents == 0 {
                return Err("amount must be positive".to_string());
            }
            log_info!(self.logger, cents, "charged");
            Ok(cents)
        }

        fn charge_logged(&self, cents: u64) -> Option<u64> {
            self.logger.execute_and_log_error(|| self.charge(cents))
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
    }

    fn build(tmp: &TempDir, cfg: &LoggingConfig) -> (Logger, CaptureWriter) {
        let console = CaptureWriter::new();
        let logger = Logger::builder("payments")
            .base_path("payments")
            .apply_config(cfg)
            .expect("valid config")
            .log_dir(tmp.path())
            .date(date())
            .console_writer(BoxMakeWriter::new(console.clone()))
            .build()
            .expect("Failed to build logger");
        (logger, console)
    }

    fn plain_config() -> LoggingConfig {
        LoggingConfig {
            color: false,
            ..Default::default()
        }
    }

    fn records(logger: &Logger) -> Vec<Value> {
        fs::read_to_string(logger.file_path().unwrap())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    // ==================== injected logger ====================

    #[test]
    fn test_injected_logger_serves_consumer() {
        let tmp = TempDir::new().unwrap();
        let (logger, console) = build(&tmp, &plain_config());
        let service = PaymentService { logger: logger.clone() };

        assert_eq!(service.charge_logged(250), Some(250));
        assert_eq!(service.charge_logged(0), None);

        let lines = console.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("charged"));
        assert!(lines[1].contains("ERROR"));
        assert!(lines[1].contains("amount must be positive"));

        let recs = records(&logger);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0]["cents"], 250);
        assert_eq!(recs[0]["logger"], "payments");
        assert_eq!(recs[1]["level"], "ERROR");
        assert_eq!(recs[1]["error"], "amount must be positive");
        assert!(recs[1]["caller"]
            .as_str()
            .unwrap()
            .contains("capture_tests.rs"));
        // file/line name the emitting site inside the crate, caller names ours
        assert!(!recs[1]["filename"]
            .as_str()
            .unwrap()
            .contains("capture_tests.rs"));
    }

    #[test]
    fn test_console_and_file_agree() {
        let tmp = TempDir::new().unwrap();
        let (logger, console) = build(&tmp, &plain_config());

        log_warn!(logger, region = "eu-west", retries = 2_u8, "gateway slow");
        log_error!(logger, code = 502, "gateway down");

        let lines = console.lines();
        let recs = records(&logger);
        assert_eq!(lines.len(), recs.len());

        for (line, rec) in lines.iter().zip(&recs) {
            assert!(line.contains(rec["message"].as_str().unwrap()));
            assert!(line.contains(rec["level"].as_str().unwrap()));
        }
        assert_eq!(recs[0]["region"], "eu-west");
        assert_eq!(recs[0]["retries"], 2);
        assert_eq!(recs[1]["code"], 502);
        assert!(lines[0].contains("retries=2"));
        assert!(lines[1].contains("code=502"));
    }

    #[test]
    fn test_console_timestamp_is_iso8601() {
        let tmp = TempDir::new().unwrap();
        let (logger, console) = build(&tmp, &plain_config());

        log_info!(logger, "stamped");

        let line = console.lines().remove(0);
        let stamp = line.split_whitespace().next().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");

        let rec = &records(&logger)[0];
        let stamp = rec["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");
    }

    // ==================== configuration ====================

    #[test]
    fn test_config_file_drives_logger() {
        let tmp = TempDir::new().unwrap();
        let mut cfg_file = Builder::new().suffix(".toml").tempfile().unwrap();
        cfg_file
            .write_all(b"level = \"error\"\ncolor = false\ncaller = false\n")
            .unwrap();
        let cfg = LoggingConfig::load(cfg_file.path()).unwrap();

        let (logger, console) = build(&tmp, &cfg);
        log_warn!(logger, "filtered");
        log_error!(logger, "kept");

        assert_eq!(console.lines().len(), 1);
        let recs = records(&logger);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["message"], "kept");
        assert!(recs[0].get("filename").is_none());
    }

    #[test]
    fn test_console_only_config() {
        let tmp = TempDir::new().unwrap();
        let cfg = LoggingConfig {
            file: false,
            ..plain_config()
        };

        let (logger, console) = build(&tmp, &cfg);
        log_info!(logger, "console only");

        assert!(logger.file_path().is_none());
        assert_eq!(console.lines().len(), 1);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_only_config() {
        let tmp = TempDir::new().unwrap();
        let cfg = LoggingConfig {
            console: false,
            ..plain_config()
        };

        let (logger, console) = build(&tmp, &cfg);
        log_info!(logger, "file only");

        assert!(console.contents().is_empty());
        assert_eq!(records(&logger).len(), 1);
        assert!(logger.sync().is_ok());
    }
}
