//! End-to-end capture tests (need ffmpeg and a microphone)

use std::process::Command;
use std::time::{Duration, SystemTime};

use voice_notes::application::ports::{RecordingStore, StreamEnd};
use voice_notes::application::{EventSink, Recorder, SessionManager};
use voice_notes::domain::config::AppConfig;
use voice_notes::domain::recording::{Recording, GENERATED_PREFIX};
use voice_notes::domain::session::Session;
use voice_notes::infrastructure::{create_capture, CpalHardware, FsRecordingStore};

#[tokio::test]
#[ignore = "Requires ffmpeg and a microphone"]
async fn record_then_stop_creates_one_voice_note() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsRecordingStore::new(dir.path());
    let recorder = Recorder::new(
        create_capture(&AppConfig::defaults()),
        SessionManager::new(CpalHardware::new()),
        Session::shared(),
        EventSink::discard(),
    );

    let destination = store
        .allocate(&Recording::generated_file_name(SystemTime::now()))
        .await
        .unwrap();
    recorder.start(&destination).await.unwrap();
    assert!(recorder.is_recording().await);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(recorder.stop().await.unwrap(), StreamEnd::Stopped);
    assert!(!recorder.is_recording().await);

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].file_name().starts_with(GENERATED_PREFIX));
    assert!(listed[0].captured_at().is_some());

    let probe = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "a:0",
            "-show_entries",
            "stream=codec_name,sample_rate,channels",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .arg(listed[0].path())
        .output()
        .expect("ffprobe should be installed alongside ffmpeg");
    let streams = String::from_utf8_lossy(&probe.stdout);
    assert!(streams.contains("codec_name=aac"), "got: {}", streams);
    assert!(streams.contains("sample_rate=44100"), "got: {}", streams);
    assert!(streams.contains("channels=1"), "got: {}", streams);
}
