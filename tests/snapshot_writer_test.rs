use elprice::config::Config;
use elprice::publish::SnapshotWriter;
use elprice::sensor::PriceSnapshot;
use tempfile::tempdir;

#[test]
fn load_without_file_is_none() {
    let dir = tempdir().unwrap();
    let writer = SnapshotWriter::new(dir.path().join("absent.json"));
    assert!(writer.load().unwrap().is_none());
}

#[test]
fn written_snapshot_loads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let writer = SnapshotWriter::new(&path);

    let mut snapshot = PriceSnapshot::pending(&Config::default());
    snapshot.state = Some(2.345);
    snapshot.available = true;
    snapshot.today = vec![2.345; 24];
    writer.write(&snapshot).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    let loaded = writer.load().unwrap().unwrap();
    assert_eq!(loaded, snapshot);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"elafgift\""));
    assert!(text.contains("\"state_class\": \"total\""));
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(SnapshotWriter::new(&path).load().is_err());
}
