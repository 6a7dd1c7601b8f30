use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use colored::Colorize;
use parking_lot::Mutex;

use super::{EventSink, LogEvent, RunId};

/// Forwards events to the `tracing` subscriber as structured records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn append(&self, run_id: RunId, event: LogEvent) {
        match &event {
            LogEvent::Response {
                status,
                url,
                latency_ms,
            } => tracing::info!(
                target: "stress",
                run_id,
                status = *status,
                url = %url,
                latency_ms = *latency_ms,
                "{}",
                event.message()
            ),
            LogEvent::Failure { url, error } => tracing::error!(
                target: "stress",
                run_id,
                url = %url,
                error = %error,
                "{}",
                event.message()
            ),
            LogEvent::Summary {
                total,
                success,
                failed,
                ..
            } => tracing::info!(
                target: "stress",
                run_id,
                total = *total,
                success = *success,
                failed = *failed,
                "{}",
                event.message()
            ),
        }
    }
}

/// Prints events to stdout with a coloured level tag.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn append(&self, run_id: RunId, event: LogEvent) {
        let tag = format!("[{}]", event.level());
        let tag = match event {
            LogEvent::Response { status: 200, .. } => tag.as_str().green().bold(),
            LogEvent::Response { .. } => tag.as_str().yellow().bold(),
            LogEvent::Failure { .. } => tag.as_str().red().bold(),
            LogEvent::Summary { .. } => tag.as_str().blue().bold(),
        };
        let run = format!("[run {}]", run_id);
        println!("{} {} {}", run.as_str().dimmed(), tag, event.message());
    }
}

/// Appends plain text lines to a file, each prefixed with `[run <id>]`.
pub struct FileSink {
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl EventSink for FileSink {
    fn append(&self, run_id: RunId, event: LogEvent) {
        let mut writer = self.writer.lock();
        let result = writeln!(writer, "[run {}] {}", run_id, event).and_then(|_| {
            // Flush at the end of a run so the file is complete once it returns.
            if matches!(event, LogEvent::Summary { .. }) {
                writer.flush()
            } else {
                Ok(())
            }
        });
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write stress log line");
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.writer.get_mut().flush();
    }
}

/// Keeps rendered lines in memory, tagged with their run.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(RunId, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line in arrival order, without run tags.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    /// Lines of a single run, in arrival order.
    pub fn lines_for(&self, run_id: RunId) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(id, _)| *id == run_id)
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl EventSink for MemorySink {
    fn append(&self, run_id: RunId, event: LogEvent) {
        self.lines.lock().push((run_id, event.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_sink_keeps_order_per_caller() {
        let sink = MemorySink::new();
        sink.append(1, LogEvent::Response {
            status: 500,
            url: "http://a/".to_string(),
            latency_ms: 1.0,
        });
        sink.append(1, LogEvent::Failure {
            url: "http://a/".to_string(),
            error: "boom".to_string(),
        });
        assert_eq!(
            sink.lines(),
            vec![
                "[INFO] 500 - http://a/ - 1.00 ms".to_string(),
                "[ERROR] Request failed to http://a/: boom".to_string(),
            ]
        );
    }

    #[test]
    fn test_memory_sink_concurrent_appends() {
        let sink = Arc::new(MemorySink::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        sink.append(3, LogEvent::Failure {
                            url: "http://a/".to_string(),
                            error: "x".to_string(),
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.len(), 2000);
        assert_eq!(sink.lines_for(3).len(), 2000);
        assert!(sink.lines_for(4).is_empty());
    }

    #[test]
    fn test_memory_sink_separates_runs() {
        let sink = MemorySink::new();
        for (run_id, status) in [(1, 200), (2, 500), (1, 201)] {
            sink.append(
                run_id,
                LogEvent::Response {
                    status,
                    url: "http://a/".to_string(),
                    latency_ms: 1.0,
                },
            );
        }
        assert_eq!(
            sink.lines_for(1),
            vec![
                "[INFO] 200 - http://a/ - 1.00 ms".to_string(),
                "[INFO] 201 - http://a/ - 1.00 ms".to_string(),
            ]
        );
        assert_eq!(sink.lines_for(2).len(), 1);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_file_sink_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stress.log");

        let sink = FileSink::open(&path).unwrap();
        sink.append(4, LogEvent::Response {
            status: 200,
            url: "http://a/".to_string(),
            latency_ms: 2.5,
        });
        sink.append(4, LogEvent::Summary {
            url: "http://a/".to_string(),
            total: 1,
            success: 1,
            failed: 0,
            avg_latency_ms: 2.5,
            throughput_rps: 1.0,
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("[run 4] [INFO] 200 - http://a/ - 2.50 ms"));
        assert_eq!(
            lines.next(),
            Some("[run 4] [SUMMARY] Stress test finished for http://a/")
        );
        assert!(contents.contains("Total requests : 1"));
    }

    #[test]
    fn test_file_sink_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stress.log");

        for _ in 0..2 {
            let sink = FileSink::open(&path).unwrap();
            sink.append(9, LogEvent::Failure {
                url: "http://a/".to_string(),
                error: "refused".to_string(),
            });
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
