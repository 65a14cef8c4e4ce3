//! Integration tests for the storage layer
//!
//! These tests verify:
//! - The append invariant: N stores produce exactly N ordered lines
//! - Size-bounded eviction drops oldest lines and respects the ceiling
//! - Concurrent writers never interleave partial lines
//! - Formatter plugging through the storage interface

use logvault::prelude::*;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn line_formatter() -> Box<dyn LogFormatter> {
    Box::new(LineFormatter::new(Box::new(JsonContextSerializer)))
}

#[test]
fn test_append_invariant() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("append.log");
    let storage = FileStorage::new(&path, line_formatter()).expect("Failed to create storage");

    for i in 0..25 {
        storage
            .store(LogLevel::Info, &format!("message {}", i), None)
            .expect("store failed");
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 25);
    for (i, line) in lines.iter().enumerate() {
        assert!(
            line.ends_with(&format!("INFO: message {}", i)),
            "line {} out of order: {}",
            i,
            line
        );
    }
}

#[test]
fn test_size_bounded_content_is_a_suffix() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("bounded.log");
    let storage = RotatingFileStorage::with_max_size(&path, line_formatter(), 600)
        .expect("Failed to create storage");

    let total = 40;
    for i in 0..total {
        storage
            .store(LogLevel::Notice, &format!("msg-{:03}", i), None)
            .expect("store failed");
    }

    assert!(fs::metadata(&path).unwrap().len() <= 600);

    // Remaining lines are the newest entries, in order, none skipped
    let content = fs::read_to_string(&path).unwrap();
    let indexes: Vec<usize> = content
        .lines()
        .map(|line| {
            let at = line.find("msg-").expect("unexpected line shape");
            line[at + 4..at + 7].parse().expect("unexpected index")
        })
        .collect();

    assert!(!indexes.is_empty());
    assert_eq!(*indexes.last().unwrap(), total - 1);
    for pair in indexes.windows(2) {
        assert_eq!(pair[1], pair[0] + 1, "evicted from the middle: {:?}", indexes);
    }
}

#[test]
fn test_concurrent_writers_never_interleave() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("concurrent.log");
    let storage = Arc::new(
        FileStorage::new(&path, line_formatter()).expect("Failed to create storage"),
    );

    let mut handles = Vec::new();
    for worker in 0..4 {
        let storage = Arc::clone(&storage);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                storage
                    .store(LogLevel::Info, &format!("worker {} entry {}", worker, i), None)
                    .expect("store failed");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 100);
    for line in lines {
        // Every line is a complete formatted entry
        assert!(line.starts_with('['), "partial line: {}", line);
        assert!(line.contains("INFO: worker"), "garbled line: {}", line);
    }
}

#[test]
fn test_two_storages_share_one_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("shared.log");

    let first = FileStorage::new(&path, line_formatter()).unwrap();
    let second = FileStorage::new(&path, line_formatter()).unwrap();

    first.store(LogLevel::Info, "from first", None).unwrap();
    second.store(LogLevel::Info, "from second", None).unwrap();
    first.store(LogLevel::Info, "first again", None).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("from first"));
    assert!(content.contains("from second"));
}

#[test]
fn test_json_formatter_through_storage() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("entries.jsonl");
    let storage = FileStorage::new(&path, Box::new(JsonFormatter::new())).unwrap();

    storage
        .store(LogLevel::Critical, "db down", Some(&json!({"attempt": 3})))
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(parsed["severity"], "CRITICAL");
    assert_eq!(parsed["message"], "db down");
    assert_eq!(parsed["context"]["attempt"], 3);
}

#[test]
fn test_daily_storage_writes_dated_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let storage = DailyLogStorage::new(dir.path(), "daily", line_formatter()).unwrap();

    storage.store(LogLevel::Info, "hello", None).unwrap();

    let name = storage.pathname().file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("daily-"));
    assert!(name.ends_with(".log"));
    assert!(storage.pathname().exists());
}
