//! The client against a live socket served from an in-memory host.

use std::sync::Arc;

use fsinfo_cli::{report, Client, ClientError, Units};
use fsinfo_core::fake::FakeHost;
use fsinfo_core::{RawStatistics, NFS_SUPER_MAGIC, TMPFS_MAGIC};
use fsinfo_service::{ControlChannel, Server};
use tempfile::TempDir;

fn serve(dir: &TempDir, host: FakeHost) -> Server {
    let host = Arc::new(host);
    let channel = Arc::new(ControlChannel::new(host.clone(), host));
    Server::bind(&dir.path().join("fs_info"), channel).unwrap()
}

fn tmpfs_gib() -> RawStatistics {
    RawStatistics {
        fs_type: TMPFS_MAGIC,
        block_size: 4096,
        total_blocks: 262_144,
        free_blocks: 131_072,
    }
}

#[test]
fn batch_continues_past_a_failing_path() {
    let dir = TempDir::new().unwrap();
    let server = serve(&dir, FakeHost::new().with_mount("/", tmpfs_gib()));
    let mut client = Client::connect(server.path()).unwrap();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let failures = report(
        &mut client,
        &["/nonexistent", "/"],
        Units::Gibibytes,
        &mut out,
        &mut err,
    )
    .unwrap();

    assert_eq!(failures, 1);
    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Path"));
    assert_eq!(
        lines[1].split_whitespace().collect::<Vec<_>>(),
        ["/", "tmpfs", "1.00", "0.50", "0.50", "50.00", "1048576.00"]
    );

    let err = String::from_utf8(err).unwrap();
    assert!(err.contains("/nonexistent"), "{}", err);
    assert!(err.contains("No such file or directory"), "{}", err);
}

#[test]
fn bytes_mode_and_relative_paths() {
    let cwd = std::env::current_dir().unwrap();
    let nfs = RawStatistics {
        fs_type: NFS_SUPER_MAGIC,
        block_size: 1024,
        total_blocks: 2048,
        free_blocks: 512,
    };
    let dir = TempDir::new().unwrap();
    let server = serve(
        &dir,
        FakeHost::new().with_mount(&cwd.join("share").to_string_lossy(), nfs),
    );
    let mut client = Client::connect(server.path()).unwrap();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let failures = report(&mut client, &["share"], Units::Bytes, &mut out, &mut err).unwrap();

    assert_eq!(failures, 0, "{}", String::from_utf8_lossy(&err));
    let out = String::from_utf8(out).unwrap();
    let row: Vec<&str> = out.lines().nth(1).unwrap().split_whitespace().collect();
    assert_eq!(
        row,
        ["share", "nfs", "2097152", "1572864", "524288", "75.00", "2048"]
    );
}

#[test]
fn missing_socket_is_a_connect_error() {
    let dir = TempDir::new().unwrap();
    let err = Client::connect(dir.path().join("absent")).err().unwrap();
    assert!(matches!(err, ClientError::Connect { .. }));
}

#[test]
fn unreadable_statistics_surface_as_io_error_kind() {
    let dir = TempDir::new().unwrap();
    let server = serve(&dir, FakeHost::new().with_unreadable("/stuck"));
    let mut client = Client::connect(server.path()).unwrap();

    let err = client.get_fs_info(b"/stuck").unwrap_err();
    assert!(matches!(err, ClientError::StatisticsUnavailable));
    // The connection stays usable after a failed query.
    assert!(matches!(
        client.get_fs_info(b"/gone"),
        Err(ClientError::NotFound)
    ));
}
