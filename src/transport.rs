//! 長さプレフィックス付きフレーム
//!
//! `[4バイト長（u32 ビッグエンディアン）][UTF-8 JSON 本体]`

use std::io::{ErrorKind, Read, Write};

use crate::error::{Error, Result};

const HEADER_LEN: usize = 4;

/// 1フレーム読む。フレームの境界で相手が閉じた場合は `Ok(None)`。
pub fn read_frame<R: Read>(reader: &mut R, max_len: usize) -> Result<Option<Vec<u8>>> {
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        match reader.read(&mut header[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(Error::Io(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "ヘッダの途中で接続が閉じられました",
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let len = u32::from_be_bytes(header) as usize;
    if len > max_len {
        return Err(Error::FrameTooLarge {
            size: len,
            limit: max_len,
        });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(Some(payload))
}

/// 上限を超えたフレームの本体を読み捨てる
///
/// [`read_frame`] が [`Error::FrameTooLarge`] を返した直後に呼ぶと、
/// 次のフレーム境界から読み直せる。
pub fn discard_payload<R: Read>(reader: &mut R, len: usize) -> Result<()> {
    let copied = std::io::copy(&mut reader.take(len as u64), &mut std::io::sink())?;
    if copied < len as u64 {
        return Err(Error::Io(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            "本体の途中で接続が閉じられました",
        )));
    }
    Ok(())
}

pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| Error::FrameTooLarge {
        size: payload.len(),
        limit: u32::MAX as usize,
    })?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn frames_are_length_prefixed() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"{}").unwrap();
        assert_eq!(buf, [0, 0, 0, 2, b'{', b'}']);

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_frame(&mut cursor, 16).unwrap(), Some(b"{}".to_vec()));
        assert_eq!(read_frame(&mut cursor, 16).unwrap(), None);
    }

    #[test]
    fn truncated_frames_are_errors() {
        let mut header_only = Cursor::new(vec![0, 0]);
        assert!(matches!(read_frame(&mut header_only, 16), Err(Error::Io(_))));

        let mut short_body = Cursor::new(vec![0, 0, 0, 5, b'a']);
        assert!(matches!(read_frame(&mut short_body, 16), Err(Error::Io(_))));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut cursor = Cursor::new(vec![0, 0, 1, 0]);
        assert!(matches!(
            read_frame(&mut cursor, 255),
            Err(Error::FrameTooLarge { size: 256, limit: 255 })
        ));
    }

    #[test]
    fn discarding_resynchronizes() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &[b'x'; 32]).unwrap();
        write_frame(&mut buf, b"{}").unwrap();

        let mut cursor = Cursor::new(buf);
        let Err(Error::FrameTooLarge { size, .. }) = read_frame(&mut cursor, 8) else {
            panic!("oversized frame expected");
        };
        discard_payload(&mut cursor, size).unwrap();
        assert_eq!(read_frame(&mut cursor, 8).unwrap(), Some(b"{}".to_vec()));

        let mut short = Cursor::new(vec![b'x'; 3]);
        assert!(matches!(discard_payload(&mut short, 10), Err(Error::Io(_))));
    }
}
