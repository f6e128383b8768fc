//! エラー型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// 数値文字列またはリクエスト全体の形式が不正
    #[error("解析エラー: {0}")]
    Parse(String),

    #[error("必須フィールドがありません: {0}")]
    MissingField(&'static str),

    #[error("ゼロ除算: {0}")]
    DivisionByZero(&'static str),

    /// min >= max となる範囲
    #[error("不正なビューポート: {0}")]
    InvalidViewport(String),

    #[error("I/O エラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("メッセージが大きすぎます: {size} バイト (上限 {limit} バイト)")]
    FrameTooLarge { size: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// ワイヤ上で使う種別名
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Parse(_) => "ParseError",
            Error::MissingField(_) => "MissingFieldError",
            Error::DivisionByZero(_) => "DivisionByZeroError",
            Error::InvalidViewport(_) => "InvalidViewportError",
            Error::Io(_) => "IoError",
            Error::FrameTooLarge { .. } => "FrameTooLargeError",
        }
    }

    /// エンドポイントで応答を返して処理を続けられるエラーかどうか
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Parse(_) | Error::MissingField(_) | Error::DivisionByZero(_) | Error::InvalidViewport(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_recoverable() {
        assert!(Error::Parse("x".into()).is_recoverable());
        assert!(Error::MissingField("min_re").is_recoverable());
        assert!(Error::DivisionByZero("zoom_level").is_recoverable());
        assert!(Error::InvalidViewport("min_re >= max_re".into()).is_recoverable());
    }

    #[test]
    fn transport_errors_are_fatal() {
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"));
        assert!(!io.is_recoverable());
        assert!(!Error::FrameTooLarge { size: 10, limit: 1 }.is_recoverable());
    }

    #[test]
    fn kinds_match_wire_names() {
        assert_eq!(Error::MissingField("zoom_level").kind(), "MissingFieldError");
        assert_eq!(Error::DivisionByZero("zoom_level").kind(), "DivisionByZeroError");
    }
}
