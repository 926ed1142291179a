//! End-to-end registration against a temporary runtime directory.

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::Arc;

use fsinfo_core::fake::FakeHost;
use fsinfo_core::{RawStatistics, EXT4_SUPER_MAGIC};
use fsinfo_service::{
    ChannelState, ControlChannel, LifecycleManager, LocalRegistrar, ServiceConfig, Step,
};
use fsinfo_wire::{
    FsInfoRecord, RequestFrame, ResponseFrame, Status, GET_FS_INFO, RESPONSE_FRAME_SIZE,
};
use tempfile::TempDir;

fn channel() -> ControlChannel {
    let host = Arc::new(
        FakeHost::new()
            .with_mount(
                "/",
                RawStatistics {
                    fs_type: EXT4_SUPER_MAGIC,
                    block_size: 4096,
                    total_blocks: 1000,
                    free_blocks: 400,
                },
            )
            .with_unreadable("/proc/broken"),
    );
    ControlChannel::new(host.clone(), host)
}

fn manager(config: ServiceConfig) -> LifecycleManager<LocalRegistrar> {
    LifecycleManager::new(LocalRegistrar::new(config, channel()))
}

fn config(dir: &TempDir) -> ServiceConfig {
    ServiceConfig::default().with_runtime_dir(dir.path())
}

fn ask(endpoint: &Path, selector: u32, path: &[u8]) -> ResponseFrame {
    let mut stream = UnixStream::connect(endpoint).unwrap();
    exchange(&mut stream, selector, path)
}

fn exchange(stream: &mut UnixStream, selector: u32, path: &[u8]) -> ResponseFrame {
    let request = RequestFrame::new(selector, FsInfoRecord::request(path).encode());
    stream.write_all(&request.encode()).unwrap();
    let mut raw = [0u8; RESPONSE_FRAME_SIZE];
    stream.read_exact(&mut raw).unwrap();
    ResponseFrame::decode(&raw).unwrap()
}

#[test]
fn start_exposes_a_working_endpoint() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manager = manager(config.clone());

    manager.start().unwrap();
    assert_eq!(manager.state(), ChannelState::EndpointVisible);
    assert!(config.endpoint_path().exists());

    let reply = ask(&config.endpoint_path(), GET_FS_INFO, b"/");
    assert_eq!(reply.status, Status::Ok);
    let record = FsInfoRecord::decode(&reply.record);
    assert_eq!(record.fs_name.as_bytes(), b"ext4");
    assert_eq!(record.total, 4_096_000);
    assert_eq!(record.free, 1_638_400);
    assert_eq!(record.used, 2_457_600);
    assert_eq!(record.path.as_bytes(), b"/");

    assert_eq!(
        ask(&config.endpoint_path(), GET_FS_INFO, b"/nope").status,
        Status::NotFound
    );
    assert_eq!(
        ask(&config.endpoint_path(), GET_FS_INFO, b"/proc/broken").status,
        Status::StatisticsUnavailable
    );
    assert_eq!(
        ask(&config.endpoint_path(), 0x1234, b"/").status,
        Status::UnsupportedOperation
    );
}

#[test]
fn one_connection_carries_many_requests() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manager = manager(config.clone());
    manager.start().unwrap();

    let mut stream = UnixStream::connect(config.endpoint_path()).unwrap();
    for path in [&b"/"[..], b"/missing", b"/"] {
        let reply = exchange(&mut stream, GET_FS_INFO, path);
        let expected = if path == b"/" {
            Status::Ok
        } else {
            Status::NotFound
        };
        assert_eq!(reply.status, expected);
    }
}

#[test]
fn stop_removes_everything_it_created() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manager = manager(config.clone());

    manager.start().unwrap();
    manager.stop().unwrap();

    assert_eq!(manager.state(), ChannelState::Uninitialized);
    assert!(!config.endpoint_path().exists());
    assert!(!config.staging_path().exists());
    assert!(!config.class_dir().exists());
    assert!(UnixStream::connect(config.endpoint_path()).is_err());
}

#[test]
fn stop_keeps_a_class_dir_it_did_not_create() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    std::fs::create_dir(config.class_dir()).unwrap();

    let manager = manager(config.clone());
    manager.start().unwrap();
    manager.stop().unwrap();

    assert!(config.class_dir().is_dir());
    assert!(!config.endpoint_path().exists());
}

#[test]
fn failed_class_registration_rolls_back() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    // A regular file where the class directory should go.
    std::fs::write(config.class_dir(), b"in the way").unwrap();

    let manager = manager(config.clone());
    let err = manager.start().unwrap_err();
    assert_eq!(err.step, Step::RegisterClass);
    assert_eq!(manager.state(), ChannelState::Uninitialized);
    assert!(!config.staging_path().exists());
    assert!(!config.endpoint_path().exists());

    // The identity was released, so a retry can reserve it again.
    std::fs::remove_file(config.class_dir()).unwrap();
    manager.start().unwrap();
    assert!(manager.is_visible());
}

#[test]
fn duplicate_identity_is_refused() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let first = manager(config.clone());
    first.start().unwrap();

    let second = manager(config.clone());
    let err = second.start().unwrap_err();
    assert_eq!(err.step, Step::ReserveIdentity);
    assert_eq!(err.source.kind(), std::io::ErrorKind::AddrInUse);

    // The first channel is unaffected.
    assert_eq!(
        ask(&config.endpoint_path(), GET_FS_INFO, b"/").status,
        Status::Ok
    );

    // Same runtime directory, different name: both can be up at once.
    let third = manager(config.clone().with_name("fs_info2"));
    third.start().unwrap();
    assert!(first.is_visible() && third.is_visible());
}

#[test]
fn invalid_name_fails_before_anything_is_created() {
    let dir = TempDir::new().unwrap();
    let manager = manager(config(&dir).with_name("../escape"));

    let err = manager.start().unwrap_err();
    assert_eq!(err.step, Step::ReserveIdentity);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unbindable_socket_fails_attach() {
    let dir = TempDir::new().unwrap();
    // Longer than any platform's socket path limit.
    let deep = dir.path().join("d".repeat(200));
    std::fs::create_dir(&deep).unwrap();
    let config = ServiceConfig::default().with_runtime_dir(&deep);

    let manager = manager(config.clone());
    let err = manager.start().unwrap_err();
    assert_eq!(err.step, Step::AttachDevice);
    assert_eq!(manager.state(), ChannelState::Uninitialized);
    assert!(!config.class_dir().exists());
}

#[test]
fn stale_endpoint_is_replaced() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    std::fs::create_dir(config.class_dir()).unwrap();
    // Bound and dropped: the file stays but nothing listens.
    drop(UnixListener::bind(config.endpoint_path()).unwrap());

    let manager = manager(config.clone());
    manager.start().unwrap();
    assert_eq!(
        ask(&config.endpoint_path(), GET_FS_INFO, b"/").status,
        Status::Ok
    );
}

#[test]
fn foreign_file_at_endpoint_fails_create() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    std::fs::create_dir(config.class_dir()).unwrap();
    std::fs::write(config.endpoint_path(), b"not ours").unwrap();

    let manager = manager(config.clone());
    let err = manager.start().unwrap_err();
    assert_eq!(err.step, Step::CreateEndpoint);
    assert_eq!(std::fs::read(config.endpoint_path()).unwrap(), b"not ours");
    assert!(!config.staging_path().exists());
}

#[test]
fn drop_unregisters() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    {
        let manager = manager(config.clone());
        manager.start().unwrap();
        assert!(config.endpoint_path().exists());
    }
    assert!(!config.endpoint_path().exists());
    assert!(!config.staging_path().exists());
}

#[test]
fn concurrent_clients() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manager = manager(config.clone());
    manager.start().unwrap();

    let endpoint = config.endpoint_path();
    let clients: Vec<_> = (0..8)
        .map(|_| {
            let endpoint = endpoint.clone();
            std::thread::spawn(move || {
                let mut stream = UnixStream::connect(&endpoint).unwrap();
                for _ in 0..20 {
                    let reply = exchange(&mut stream, GET_FS_INFO, b"/");
                    assert_eq!(reply.status, Status::Ok);
                    let record = FsInfoRecord::decode(&reply.record);
                    assert_eq!(record.used + record.free, record.total);
                }
            })
        })
        .collect();
    for client in clients {
        client.join().unwrap();
    }
}

#[test]
fn stop_hangs_up_on_open_connections() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manager = manager(config.clone());
    manager.start().unwrap();

    let mut stream = UnixStream::connect(config.endpoint_path()).unwrap();
    assert_eq!(exchange(&mut stream, GET_FS_INFO, b"/").status, Status::Ok);

    manager.stop().unwrap();
    let mut buf = [0u8; 1];
    assert_eq!(stream.read(&mut buf).unwrap_or(0), 0);
}

#[test]
fn stop_completes_when_the_staging_socket_vanished() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let manager = Arc::new(manager(config.clone()));
    manager.start().unwrap();

    std::fs::remove_file(config.staging_path()).unwrap();

    let (done, finished) = std::sync::mpsc::channel();
    let stopping = manager.clone();
    std::thread::spawn(move || {
        let _ = done.send(stopping.stop());
    });
    let result = finished
        .recv_timeout(std::time::Duration::from_secs(5))
        .expect("stop did not return");
    result.unwrap();

    assert_eq!(manager.state(), ChannelState::Uninitialized);
    assert!(!config.endpoint_path().exists());

    // The identity was released along the way.
    manager.start().unwrap();
    assert!(manager.is_visible());
}
