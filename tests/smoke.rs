use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use vrinteract_core::SimTick;
use vrinteract_testkit::{EventRecord, JsonlSink, SessionHeader};

fn temp_dir(name: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("vrinteract-{name}-{nanos}"))
}

#[test]
fn deterministic_event_stream_can_be_written() {
    let mut sink = JsonlSink::create(std::env::temp_dir().join("eventlog.jsonl"))
        .expect("can create temp log");
    sink.write(&SessionHeader::now(30.0, "smoke"))
        .expect("can write header");
    let tick = SimTick::ZERO.advance(1);
    let record = EventRecord::new(tick, "SmokeTest", "session", "ok");
    sink.write(&record).expect("can write event");
    assert_eq!(sink.lines(), 2);
}

#[test]
fn headless_binary_reads_every_page() {
    let dir = temp_dir("smoke");
    let config = dir.join("interface.toml");
    let log = dir.join("events.jsonl");
    std::fs::create_dir_all(&dir).expect("create temp dir");
    std::fs::write(&config, "pages = [\"one\", \"two\"]\n").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_vrinteract"))
        .arg("--config")
        .arg(&config)
        .arg("--event-log")
        .arg(&log)
        .arg("--max-ticks")
        .arg("300")
        .output()
        .expect("run vrinteract");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("completed"), "stdout: {stdout}");

    let contents = std::fs::read_to_string(&log).expect("event log written");
    let lines: Vec<_> = contents.lines().collect();
    assert!(lines[0].contains("started_at"));
    let selected = lines
        .iter()
        .filter(|line| line.contains("\"kind\":\"selected\""))
        .count();
    assert_eq!(selected, 2);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_config_emits_a_loadable_file() {
    let dir = temp_dir("write-config");
    let config = dir.join("nested").join("interface.toml");

    let status = Command::new(env!("CARGO_BIN_EXE_vrinteract"))
        .arg("--config")
        .arg(&config)
        .arg("--write-config")
        .status()
        .expect("run vrinteract");
    assert!(status.success());

    let contents = std::fs::read_to_string(&config).expect("config written");
    assert!(contents.contains("tick_rate"));
    assert!(contents.contains("[selection_plane]"));
    let _ = std::fs::remove_dir_all(&dir);
}
