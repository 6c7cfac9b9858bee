//! Integration tests for the relay pipeline
//!
//! Runs real file and socket endpoints through the public API.

use line_relay::{
    build_destination, build_source, Destination, EndpointSpec, Exporter, FileDestination,
    FileSource, Record, RelayMetrics, RelayOptions, RelayService, ShutdownController,
    SocketSource,
};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::sync::mpsc;

fn append(path: &Path, data: &str) {
    append_bytes(path, data.as_bytes());
}

fn append_bytes(path: &Path, data: &[u8]) {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(data).unwrap();
}

async fn wait_for_contents(path: &Path, expected: &str) {
    for _ in 0..300 {
        if std::fs::read_to_string(path).map(|s| s == expected).unwrap_or(false) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "{} never reached {:?}, has {:?}",
        path.display(),
        expected,
        std::fs::read_to_string(path).ok()
    );
}

async fn export_all(records: &[&str], destinations: Vec<Box<dyn Destination>>) {
    let (tx, rx) = mpsc::channel(records.len().max(1));
    let mut exporter = Exporter::new(rx, destinations, Arc::new(RelayMetrics::new()));
    for text in records {
        tx.send(Record::from(*text)).await.unwrap();
    }
    drop(tx);
    exporter.run(&ShutdownController::new()).await;
}

/// Record without delimiter, newline option off: file holds exactly the record
#[tokio::test]
async fn test_file_destination_without_newline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.log");

    export_all(&["hello"], vec![Box::new(FileDestination::new(&path, false))]).await;

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
}

/// Newline option on: each record is terminated
#[tokio::test]
async fn test_file_destination_with_newline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.log");

    export_all(&["hello"], vec![Box::new(FileDestination::new(&path, true))]).await;

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
}

/// Two records to two destinations arrive in the same order at both
#[tokio::test]
async fn test_two_records_two_destinations() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    export_all(
        &["a", "b"],
        vec![
            build_destination(&EndpointSpec::File(first.display().to_string()), false),
            build_destination(&EndpointSpec::File(second.display().to_string()), false),
        ],
    )
    .await;

    assert_eq!(std::fs::read_to_string(&first).unwrap(), "ab");
    assert_eq!(std::fs::read_to_string(&second).unwrap(), "ab");
}

/// A growing file is tailed into another file while the relay runs
#[tokio::test]
async fn test_file_to_file_relay() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.log");
    let output = dir.path().join("out.log");
    append(&input, "one\ntwo\n");

    let service = RelayService::new(
        vec![Box::new(FileSource::new(&input))],
        vec![Box::new(FileDestination::new(&output, false))],
        RelayOptions::default(),
    );
    let shutdown = ShutdownController::new();
    let handle = tokio::spawn(service.run(shutdown.clone()));

    wait_for_contents(&output, "one\ntwo\n").await;

    append(&input, "three\n");
    wait_for_contents(&output, "one\ntwo\nthree\n").await;

    shutdown.shutdown();
    let snapshot = handle.await.unwrap();
    assert_eq!(snapshot.records_imported, 3);
    assert_eq!(snapshot.records_exported, 3);
}

/// Bytes that are not valid UTF-8 are relayed unchanged
#[tokio::test]
async fn test_file_relay_preserves_raw_bytes() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.bin");
    let output = dir.path().join("out.bin");
    let payload: &[u8] = b"caf\xe9\n\xff\xfe raw\n";
    append_bytes(&input, payload);

    let service = RelayService::new(
        vec![Box::new(FileSource::new(&input))],
        vec![Box::new(FileDestination::new(&output, false))],
        RelayOptions::default(),
    );
    let shutdown = ShutdownController::new();
    let handle = tokio::spawn(service.run(shutdown.clone()));

    for _ in 0..300 {
        if std::fs::read(&output).map(|b| b == payload).unwrap_or(false) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    shutdown.shutdown();
    let snapshot = handle.await.unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), payload);
    assert_eq!(snapshot.records_exported, 2);
}

/// A unix socket client feeds two file destinations
#[tokio::test]
async fn test_socket_to_files_relay() {
    let dir = TempDir::new().unwrap();
    let sock = dir.path().join("in.sock");
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    let service = RelayService::new(
        vec![build_source(&EndpointSpec::Socket(format!(
            "unix://{}",
            sock.display()
        )))],
        vec![
            Box::new(FileDestination::new(&first, false)),
            Box::new(FileDestination::new(&second, false)),
        ],
        RelayOptions::default(),
    );
    let shutdown = ShutdownController::new();
    let handle = tokio::spawn(service.run(shutdown.clone()));

    let mut client = None;
    for _ in 0..100 {
        if let Ok(stream) = UnixStream::connect(&sock).await {
            client = Some(stream);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let mut client = client.expect("relay never listened");
    client.write_all(b"x1\nx2\nx3\n").await.unwrap();

    wait_for_contents(&first, "x1\nx2\nx3\n").await;
    wait_for_contents(&second, "x1\nx2\nx3\n").await;

    drop(client);
    shutdown.shutdown();
    handle.await.unwrap();

    // Closing the source unlinks its socket file
    assert!(!sock.exists());
}

/// One unreachable destination does not stop delivery to the others
#[tokio::test]
async fn test_unreachable_destination_does_not_block_others() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.log");
    let missing = dir.path().join("no-such-dir").join("bad.log");

    export_all(
        &["r1\n", "r2\n"],
        vec![
            Box::new(FileDestination::new(&missing, false)),
            Box::new(FileDestination::new(&good, false)),
        ],
    )
    .await;

    assert_eq!(std::fs::read_to_string(&good).unwrap(), "r1\nr2\n");
    assert!(!missing.exists());
}

/// Sources and destinations do not touch their endpoints before first use
#[tokio::test]
async fn test_nothing_opened_before_run() {
    let dir = TempDir::new().unwrap();
    let sock = dir.path().join("lazy.sock");
    let output = dir.path().join("lazy.log");

    let service = RelayService::new(
        vec![Box::new(SocketSource::new(sock.to_str().unwrap()))],
        vec![Box::new(FileDestination::new(&output, true))],
        RelayOptions::default(),
    );

    assert!(!sock.exists());
    assert!(!output.exists());

    let shutdown = ShutdownController::new();
    shutdown.shutdown();
    tokio::time::timeout(Duration::from_secs(2), service.run(shutdown))
        .await
        .unwrap();

    assert!(!output.exists());
}
