//! File system scenarios for the rotating writer.

use std::fs;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use platform_rotatelog::{RotateConfig, RotateError, RotatingWriter};
use test_utils::{EventRecorder, LogDir, ManualClock, touch_with_mtime, wait_until};

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn test_size_threshold_checked_on_next_write() {
    let dir = LogDir::new().unwrap();
    let writer = RotatingWriter::new(
        RotateConfig::new(dir.pattern("test.%Y-%m-%d"))
            .with_clock(ManualClock::at("2024-01-01T08:00:00Z"))
            .with_rotation_size(100),
    )
    .unwrap();

    writer.write(&[b'a'; 150]).unwrap();
    assert_eq!(dir.names().unwrap(), vec!["test.2024-01-01"]);
    assert_eq!(fs::metadata(dir.join("test.2024-01-01")).unwrap().len(), 150);

    writer.write(b"b").unwrap();
    assert_eq!(
        writer.current_file_name(),
        Some(dir.join("test.2024-01-01.1"))
    );
    assert_eq!(fs::read(dir.join("test.2024-01-01.1")).unwrap(), b"b");
    assert_eq!(fs::metadata(dir.join("test.2024-01-01")).unwrap().len(), 150);
}

#[test]
fn test_forced_rotations_produce_distinct_generations() {
    let dir = LogDir::new().unwrap();
    let writer = RotatingWriter::new(
        RotateConfig::new(dir.pattern("app.%Y%m%d")).with_clock(ManualClock::at("2024-05-01T12:00:00Z")),
    )
    .unwrap();

    let rotations = 4;
    for span in 0..rotations {
        writer.rotate().unwrap();
        writer.write(format!("span {span}\n").as_bytes()).unwrap();
    }

    assert_eq!(
        dir.names().unwrap(),
        vec!["app.20240501", "app.20240501.1", "app.20240501.2", "app.20240501.3"]
    );
    for (span, name) in ["app.20240501", "app.20240501.1", "app.20240501.2", "app.20240501.3"]
        .iter()
        .enumerate()
    {
        let content = fs::read_to_string(dir.join(name)).unwrap();
        assert_eq!(content, format!("span {span}\n"));
    }
}

#[test]
fn test_bucket_change_resets_generation_and_emits_events() {
    let dir = LogDir::new().unwrap();
    let clock = ManualClock::at("2024-01-01T23:59:00Z");
    let recorder = EventRecorder::new();
    let writer = RotatingWriter::new(
        RotateConfig::new(dir.pattern("app.%Y%m%d"))
            .with_clock(clock.clone())
            .with_handler(recorder.handler()),
    )
    .unwrap();

    writer.write(b"one\n").unwrap();
    writer.rotate().unwrap();
    writer.write(b"two\n").unwrap();
    clock.advance(Duration::from_secs(120));
    writer.write(b"three\n").unwrap();

    assert_eq!(writer.current_file_name(), Some(dir.join("app.20240102")));
    assert_eq!(fs::read(dir.join("app.20240102")).unwrap(), b"three\n");

    assert!(recorder.wait_for(3, WAIT));
    let mut events = recorder.events();
    events.sort_by(|a, b| a.current().cmp(b.current()));
    assert_eq!(events[0].current(), dir.join("app.20240101"));
    assert_eq!(events[0].previous(), None);
    assert_eq!(events[1].current(), dir.join("app.20240101.1"));
    assert_eq!(events[2].current(), dir.join("app.20240102"));
    assert_eq!(events[2].previous(), Some(dir.join("app.20240101.1").as_path()));
}

#[test]
fn test_new_bucket_appends_to_existing_file() {
    let dir = LogDir::new().unwrap();
    fs::write(dir.join("app.20240101"), b"old\n").unwrap();
    let writer = RotatingWriter::new(
        RotateConfig::new(dir.pattern("app.%Y%m%d")).with_clock(ManualClock::at("2024-01-01T08:00:00Z")),
    )
    .unwrap();

    writer.write(b"new\n").unwrap();
    assert_eq!(fs::read(dir.join("app.20240101")).unwrap(), b"old\nnew\n");
}

#[test]
fn test_force_new_file_skips_existing_file() {
    let dir = LogDir::new().unwrap();
    fs::write(dir.join("app.20240101"), b"old\n").unwrap();
    let writer = RotatingWriter::new(
        RotateConfig::new(dir.pattern("app.%Y%m%d"))
            .with_clock(ManualClock::at("2024-01-01T08:00:00Z"))
            .force_new_file(),
    )
    .unwrap();

    writer.write(b"new\n").unwrap();
    assert_eq!(writer.current_file_name(), Some(dir.join("app.20240101.1")));
    assert_eq!(fs::read(dir.join("app.20240101")).unwrap(), b"old\n");
}

#[test]
fn test_count_retention_removes_oldest_and_keeps_symlink_valid() {
    let dir = LogDir::new().unwrap();
    let kept = 3;
    for day in 3..=10 {
        fs::write(dir.join(&format!("app.202401{day:02}")), b"x").unwrap();
    }
    let writer = RotatingWriter::new(
        RotateConfig::new(dir.pattern("app.%Y%m%d"))
            .with_clock(ManualClock::at("2024-01-10T12:00:00Z"))
            .with_rotation_count(kept)
            .with_link_name(dir.join("current")),
    )
    .unwrap();

    writer.write(b"y").unwrap();

    let expected = vec!["app.20240108", "app.20240109", "app.20240110", "current"];
    assert!(wait_until(WAIT, || dir.names().unwrap() == expected), "{:?}", dir.names());
    assert_eq!(fs::read(dir.join("current")).unwrap(), b"xy");
}

#[test]
fn test_age_retention_removes_only_older_files() {
    let dir = LogDir::new().unwrap();
    let now = SystemTime::now();
    touch_with_mtime(&dir.join("app.stale"), b"x", now - Duration::from_secs(3 * 24 * 3600)).unwrap();
    touch_with_mtime(&dir.join("app.fresh"), b"x", now - Duration::from_secs(3600)).unwrap();

    let writer = RotatingWriter::new(
        RotateConfig::new(dir.pattern("app.%Y%m%d"))
            .with_utc()
            .with_max_age(Duration::from_secs(24 * 3600)),
    )
    .unwrap();
    writer.write(b"z").unwrap();

    assert!(wait_until(WAIT, || !dir.join("app.stale").exists()));
    assert!(dir.join("app.fresh").exists());
    assert!(writer.current_file_name().unwrap().exists());
}

#[cfg(unix)]
#[test]
fn test_symlink_in_subdirectory_is_relative() {
    let dir = LogDir::new().unwrap();
    let link = dir.path().join("links").join("current");
    let writer = RotatingWriter::new(
        RotateConfig::new(dir.pattern("app.%Y%m%d"))
            .with_clock(ManualClock::at("2024-01-01T08:00:00Z"))
            .with_link_name(&link),
    )
    .unwrap();

    writer.write(b"first").unwrap();
    assert_eq!(fs::read_link(&link).unwrap(), std::path::PathBuf::from("../app.20240101"));

    writer.rotate().unwrap();
    assert_eq!(fs::read_link(&link).unwrap(), std::path::PathBuf::from("../app.20240101.1"));
}

#[test]
fn test_close_twice_is_ok() {
    let dir = LogDir::new().unwrap();
    let writer = RotatingWriter::new(RotateConfig::new(dir.pattern("app.%Y%m%d"))).unwrap();
    writer.write(b"x").unwrap();

    assert!(writer.close().is_ok());
    assert!(writer.close().is_ok());

    let err = Write::write(&mut &writer, b"y").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
}

#[test]
fn test_rejects_both_retention_policies() {
    let result = RotatingWriter::new(
        RotateConfig::new("app.%Y%m%d")
            .with_max_age(Duration::from_secs(3600))
            .with_rotation_count(2),
    );
    assert!(matches!(result, Err(RotateError::InvalidArgument(_))));
}

#[test]
fn test_tracing_events_land_in_rotating_file() {
    let dir = LogDir::new().unwrap();
    let writer = Arc::new(
        RotatingWriter::new(
            RotateConfig::new(dir.pattern("trace.%Y%m%d")).with_clock(ManualClock::at("2024-01-01T08:00:00Z")),
        )
        .unwrap(),
    );

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(Arc::clone(&writer))
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(request = 7, "handled request");
    });
    (&*writer).flush().unwrap();

    let content = fs::read_to_string(dir.join("trace.20240101")).unwrap();
    assert!(content.contains("handled request"), "{content}");
    assert!(content.contains("request=7"), "{content}");
}
