use std::fs;
use tempfile::tempdir;

use holographer::fs_ops::{checksum_chunked, checksum_named, is_sentinel, FILE_NOT_FOUND, IS_A_DIRECTORY};
use holographer::{checksum, ChecksumAlgorithm};

#[test]
fn directory_and_missing_path_get_sentinels() {
    let td = tempdir().unwrap();
    for algo in [ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha256, ChecksumAlgorithm::Blake3] {
        assert_eq!(checksum(td.path(), algo).unwrap(), IS_A_DIRECTORY);
        assert_eq!(checksum(&td.path().join("nope"), algo).unwrap(), FILE_NOT_FOUND);
    }
    assert!(is_sentinel(IS_A_DIRECTORY));
    assert!(!is_sentinel("49f68a5c8493ec2c0bf489821c21fc3b"));
}

#[test]
fn digest_is_deterministic_and_independent_of_chunk_size() {
    let td = tempdir().unwrap();
    let f = td.path().join("data.bin");
    let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(&f, &data).unwrap();

    for algo in [ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha256, ChecksumAlgorithm::Blake3] {
        let whole = checksum(&f, algo).unwrap();
        assert_eq!(checksum(&f, algo).unwrap(), whole);
        assert_eq!(checksum_chunked(&f, algo, 7).unwrap(), whole);
        assert_eq!(checksum_chunked(&f, algo, 4096).unwrap(), whole);
    }
}

#[test]
fn named_algorithms() {
    let td = tempdir().unwrap();
    let f = td.path().join("hi.txt");
    fs::write(&f, "hi").unwrap();

    assert_eq!(checksum_named(&f, "md5").unwrap(), "49f68a5c8493ec2c0bf489821c21fc3b");
    assert_eq!(checksum_named(&f, "sha256").unwrap().len(), 64);
    assert_eq!(checksum_named(&f, "blake3").unwrap().len(), 64);

    let err = checksum_named(&f, "crc32").unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("unsupported checksum kind"), "{err}");
}
