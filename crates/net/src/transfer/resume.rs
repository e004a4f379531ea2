//! Resume offset discovery

use ghfetch_errors::Error;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs as tokio_fs;

/// Current size of a partial download, `0` when nothing is on disk yet
///
/// # Errors
///
/// Returns an error if the path exists but its metadata cannot be read, or if
/// it is not a regular file.
pub async fn partial_size(path: &Path) -> Result<u64, Error> {
    match tokio_fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(metadata.len()),
        Ok(_) => Err(Error::io_with_path(
            &std::io::Error::new(ErrorKind::InvalidInput, "download target is not a file"),
            path,
        )),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(e) => Err(Error::io_with_path(&e, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_partial_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.tar.gz.incomplete");

        assert_eq!(partial_size(&path).await.unwrap(), 0);

        tokio_fs::write(&path, b"12345").await.unwrap();
        assert_eq!(partial_size(&path).await.unwrap(), 5);

        assert!(partial_size(dir.path()).await.is_err());
    }
}
