use rostra::application::ports::{AudioStore, AudioStoreError};
use rostra::domain::StorageKey;
use rostra::infrastructure::storage::LocalAudioStore;

#[tokio::test]
async fn given_uploaded_audio_when_downloading_then_bytes_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalAudioStore::new(dir.path().to_path_buf()).unwrap();
    let key = StorageKey::from_raw("sessions/abc/talk.wav");
    let payload = vec![7u8; 2048];

    let url = store
        .upload(&key, payload.clone(), "audio/wav")
        .await
        .unwrap();
    assert!(url.contains("talk.wav"));

    let downloaded = store.download(&key).await.unwrap();
    assert_eq!(downloaded, payload);
}

#[tokio::test]
async fn given_missing_key_when_downloading_then_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalAudioStore::new(dir.path().to_path_buf()).unwrap();
    let key = StorageKey::from_raw("sessions/never/uploaded.wav");

    let result = store.download(&key).await;

    assert!(matches!(result, Err(AudioStoreError::NotFound(_))));
}
