//! Tests for the process-wide logger and the logging macros

#[cfg(test)]
mod integration_tests {
    use crate::{
        options::{also_stdout, every_hour, every_minute, log_file_path, print_stack, warn_level},
        registry, ConfigOption, Error, LogLevel,
    };
    use regex::Regex;
    use serial_test::serial;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    fn line_pattern() -> Regex {
        Regex::new(
            r"^\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2} (DEBUG| INFO| WARN|ERROR|FATAL) \[[^\]]+\] \([^:()]+:\d+\) - .*$",
        )
        .unwrap()
    }

    fn defaults() -> Vec<ConfigOption> {
        Vec::new()
    }

    /// Every line across all files in `dir`
    fn all_lines(dir: &Path) -> Vec<String> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        files.sort();
        files
            .into_iter()
            .flat_map(|path| {
                let content = std::fs::read_to_string(path).unwrap();
                assert!(content.is_empty() || content.ends_with('\n'));
                content.lines().map(str::to_string).collect::<Vec<_>>()
            })
            .collect()
    }

    fn single_log_file(dir: &Path) -> PathBuf {
        let files: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1, "{:?}", files);
        files.into_iter().next().unwrap()
    }

    #[test]
    #[serial]
    fn test_single_info_line() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("log");

        let logger = crate::start([log_file_path(&log_dir)]);
        crate::info!("{}", "x");
        logger.stop();

        let content = std::fs::read_to_string(single_log_file(&log_dir)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(line_pattern().is_match(lines[0]), "{}", lines[0]);
        assert!(lines[0].contains("  INFO [test_single_info_line] (tests.rs:"));
        assert!(lines[0].ends_with(" - x"));
    }

    #[test]
    #[serial]
    fn test_second_start_fails() {
        let logger = crate::start(defaults());

        assert!(matches!(
            crate::try_start(defaults()),
            Err(Error::AlreadyStarted)
        ));
        assert!(registry::active().is_some());

        logger.stop();
        assert!(registry::active().is_none());
    }

    #[test]
    #[serial]
    #[should_panic(expected = "logger already started")]
    fn test_second_start_panics() {
        let _logger = crate::start(defaults());
        let _second = crate::start(defaults());
    }

    #[test]
    #[serial]
    fn test_concurrent_starts_admit_one() {
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    crate::try_start(defaults()).ok()
                })
            })
            .collect();

        let started: Vec<_> = handles
            .into_iter()
            .filter_map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(started.len(), 1);
    }

    #[test]
    #[serial]
    fn test_stop_twice_and_restart() {
        let temp_dir = TempDir::new().unwrap();

        let first = crate::start([log_file_path(temp_dir.path()), print_stack()]);
        crate::warn!("before stop");
        first.stop();
        first.stop();
        crate::warn!("while stopped");

        let path = single_log_file(temp_dir.path());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("stack backtrace:").count(), 1);
        assert!(!content.contains("while stopped"));

        let second = crate::start([log_file_path(temp_dir.path())]);
        assert!(!second.is_stopped());
        drop(second);
        drop(first);
        assert!(registry::active().is_none());
    }

    #[test]
    #[serial]
    fn test_drop_handle_stops_logger() {
        {
            let _logger = crate::start(defaults());
            assert!(registry::active().is_some());
        }
        assert!(registry::active().is_none());
        assert!(crate::try_start(defaults()).is_ok());
    }

    #[test]
    #[serial]
    fn test_no_active_logger_is_noop() {
        assert!(registry::active().is_none());
        crate::debug!("nobody listening {}", 1);
        crate::errorln!("nobody", "listening");
        crate::log!(LogLevel::Warn, "still nobody");
    }

    #[test]
    #[serial]
    fn test_global_level_filter() {
        let temp_dir = TempDir::new().unwrap();
        let logger = crate::start([log_file_path(temp_dir.path()), warn_level()]);

        crate::debug!("debug");
        crate::info!("info");
        crate::warn!("warn");
        crate::error!("error");
        crate::debugln!("debug", "ln");
        crate::infoln!("info", "ln");
        crate::warnln!("warn", "ln");
        crate::errorln!("error", "ln");
        logger.stop();

        let content = std::fs::read_to_string(single_log_file(temp_dir.path())).unwrap();
        let messages: Vec<&str> = content
            .lines()
            .map(|line| line.rsplit(" - ").next().unwrap())
            .collect();
        assert_eq!(messages, vec!["warn", "error", "warnln", "errorln"]);
    }

    #[test]
    #[serial]
    fn test_caller_inside_closure() {
        let temp_dir = TempDir::new().unwrap();
        let logger = crate::start([log_file_path(temp_dir.path())]);

        let emit = || crate::info!("from closure");
        emit();
        logger.stop();

        let content = std::fs::read_to_string(single_log_file(temp_dir.path())).unwrap();
        assert!(content.contains("[test_caller_inside_closure]"), "{}", content);
    }

    #[test]
    #[serial]
    fn test_many_threads_one_file() {
        let temp_dir = TempDir::new().unwrap();
        let logger = crate::start([log_file_path(temp_dir.path()), every_hour()]);

        let handles: Vec<_> = (0..100)
            .map(|i| {
                thread::spawn(move || {
                    crate::info!("Wake up, Neo {}", i);
                    crate::warn!("The Matrix has you...");
                    crate::error!("Follow the white rabbit");
                    crate::infoln!("Knock ", "knock!");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        logger.stop();

        // An hour boundary may fall inside the test, so count across files
        let lines = all_lines(temp_dir.path());
        let pattern = line_pattern();
        for line in &lines {
            assert!(pattern.is_match(line), "malformed line: {}", line);
        }
        assert_eq!(lines.len(), 400);
    }

    #[test]
    #[serial]
    fn test_minute_rotation_with_echo() {
        let temp_dir = TempDir::new().unwrap();
        let logger = crate::start([log_file_path(temp_dir.path()), every_minute(), also_stdout()]);

        let writer = logger.writer().unwrap();
        assert!(writer.next_rotation().is_some());

        for _ in 0..10 {
            crate::info!("{}", "Jingle bells, jingle bells,");
            crate::warn!("{}", "Jingle all the way.");
        }
        logger.stop();

        // A boundary may fall inside the loop, so allow a second file
        assert_eq!(all_lines(temp_dir.path()).len(), 20);
    }
}
