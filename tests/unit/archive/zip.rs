use super::*;

#[test]
fn assemble_then_extract_is_lossless() {
    let noise: Vec<u8> = (0..10_000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
    let entries = vec![
        ArchiveEntry::new("iOS/Icon-App-20x20@2x.png", vec![1, 2, 3]),
        ArchiveEntry::new("mipmap-hdpi/ic_launcher.png", noise.clone()),
        ArchiveEntry::new("web/favicon.png", Vec::new()),
        ArchiveEntry::new("readme.txt", b"hello".repeat(500)),
    ];
    let blob = assemble(&entries).unwrap();
    assert_eq!(blob.entry_count, 4);
    let back = extract(&blob.bytes).unwrap();
    assert_eq!(back, entries);
}

#[test]
fn empty_archive_is_valid() {
    let blob = assemble(&[]).unwrap();
    assert_eq!(blob.entry_count, 0);
    assert!(extract(&blob.bytes).unwrap().is_empty());
}

#[test]
fn paths_are_normalized() {
    let blob = assemble(&[ArchiveEntry::new(r"iPad\./portrait.png", vec![9])]).unwrap();
    let back = extract(&blob.bytes).unwrap();
    assert_eq!(back[0].path, "iPad/portrait.png");
}

#[test]
fn invalid_and_duplicate_paths_are_archive_errors() {
    for bad in ["/etc/passwd", "../x.png", "a/../../b", "", "./", "C:/x.png"] {
        let err = assemble(&[ArchiveEntry::new(bad, vec![])]).unwrap_err();
        assert!(matches!(err, ForgeError::Archive(_)), "{bad}: {err}");
    }
    let err = assemble(&[
        ArchiveEntry::new("a/b.png", vec![1]),
        ArchiveEntry::new("a//b.png", vec![2]),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("duplicate"));
    assert!(err.is_fatal());
}

#[test]
fn output_is_deterministic() {
    let entries = vec![ArchiveEntry::new("x.png", vec![7; 64])];
    assert_eq!(assemble(&entries).unwrap(), assemble(&entries).unwrap());
}

#[test]
fn extract_rejects_garbage() {
    assert!(matches!(extract(b"not a zip"), Err(ForgeError::Archive(_))));
}
