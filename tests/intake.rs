use photo_enhancer::encoded::EncodedImage;
use photo_enhancer::intake::{self, ImageBlob};
use tempfile::tempdir;

#[test]
fn reads_image_file_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("photo.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\n").unwrap();

    let blob = ImageBlob::from_path(&path);
    assert_eq!(blob.name, "photo.png");
    assert_eq!(blob.media_type, "image/png");

    let image = intake::submit(blob, None).unwrap().wait().unwrap().unwrap();
    assert_eq!(image.display_name, "photo.png");
    assert_eq!(image.media_type, "image/png");
    assert_eq!(image.encoded, EncodedImage::encode("image/png", b"\x89PNG\r\n\x1a\n"));
    assert!(image.encoded.as_str().starts_with("data:image/png;base64,"));
}

#[test]
fn rejects_non_image_without_reading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let err = intake::submit(ImageBlob::from_path(&path), None).err().unwrap();
    assert_eq!(err.display_name, "notes.txt");
    assert_eq!(err.media_type, "text/plain");
}

#[test]
fn missing_file_fails_once() {
    let dir = tempdir().unwrap();
    let blob = ImageBlob::from_path(dir.path().join("gone.jpg"));
    let outcome = intake::submit(blob, None).unwrap().wait().unwrap();
    assert!(outcome.is_err());
}

#[test]
fn waker_runs_after_read() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let woken = Arc::new(AtomicUsize::new(0));
    let counter = woken.clone();
    let blob = ImageBlob::from_bytes("a.gif", "image/gif", b"GIF89a".to_vec());
    let pending = intake::submit(blob, Some(Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })))
    .unwrap();
    let image = pending.wait().unwrap().unwrap();
    assert_eq!(image.encoded.decode().unwrap(), b"GIF89a");

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while woken.load(Ordering::SeqCst) == 0 {
        assert!(std::time::Instant::now() < deadline);
        std::thread::yield_now();
    }
    assert_eq!(woken.load(Ordering::SeqCst), 1);
}
