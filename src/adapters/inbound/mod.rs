mod file_source;
mod socket_source;

pub use file_source::FileSource;
pub use socket_source::SocketSource;

use crate::domain::entities::Record;
use crate::domain::error::RelayError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Read through the next newline into `pending` and emit it as a record.
///
/// A line without its delimiter stays buffered in `pending` and is reported
/// as end-of-stream; the next call appends the rest of it. Bytes are kept
/// as read, with no UTF-8 decoding.
pub(crate) async fn read_line_record<R>(
    reader: &mut R,
    pending: &mut Vec<u8>,
) -> Result<Record, RelayError>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    match reader.read_until(b'\n', pending).await {
        Ok(_) if pending.last() == Some(&b'\n') => {
            Ok(Record::from(std::mem::take(pending)))
        }
        Ok(_) => Err(RelayError::EndOfStream),
        Err(e) => Err(RelayError::Read(e)),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_lines_with_delimiter() {
        let mut reader: &[u8] = b"a\nb\n";
        let mut pending = Vec::new();

        let first = read_line_record(&mut reader, &mut pending).await.unwrap();
        let second = read_line_record(&mut reader, &mut pending).await.unwrap();

        assert_eq!(first.to_string_lossy(), "a\n");
        assert_eq!(second.to_string_lossy(), "b\n");
        assert!(read_line_record(&mut reader, &mut pending)
            .await
            .unwrap_err()
            .is_end_of_stream());
    }

    #[tokio::test]
    async fn test_partial_line_is_buffered() {
        let mut pending = Vec::new();

        let mut reader: &[u8] = b"hel";
        let err = read_line_record(&mut reader, &mut pending).await.unwrap_err();
        assert!(err.is_end_of_stream());
        assert_eq!(pending, b"hel");

        let mut reader: &[u8] = b"lo\n";
        let record = read_line_record(&mut reader, &mut pending).await.unwrap();
        assert_eq!(record.to_string_lossy(), "hello\n");
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_non_utf8_bytes_pass_through() {
        let mut reader: &[u8] = b"a\xffb\n";
        let mut pending = Vec::new();

        let record = read_line_record(&mut reader, &mut pending).await.unwrap();
        assert_eq!(record.as_bytes(), b"a\xffb\n");
    }
}
