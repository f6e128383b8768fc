//! 起動時の設定

use clap::Parser;

use crate::common::constants::{DEFAULT_HOST, DEFAULT_MAX_FRAME_BYTES, DEFAULT_PORT, DEFAULT_PRECISION_DIGITS};
use crate::common::number::Precision;

/// サービスの設定。起動時に一度だけ読み込み、以後は変更しない。
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mandelbrot-zoom")]
#[command(author, version, about = "マンデルブロ集合の深いズーム用 任意精度ビューポート計算サービス")]
pub struct Config {
    /// 有効桁数（10進）
    #[arg(
        long = "precision",
        env = "MANDELBROT_PRECISION",
        default_value_t = DEFAULT_PRECISION_DIGITS,
        value_parser = clap::value_parser!(u32).range(1..=100_000)
    )]
    pub precision_digits: u32,

    /// 待ち受けるホスト
    #[arg(long, env = "MANDELBROT_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// 待ち受けるポート
    #[arg(short, long, env = "MANDELBROT_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// 1メッセージの最大バイト数
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    pub max_frame_bytes: usize,
}

impl Config {
    pub fn precision(&self) -> Precision {
        Precision::new(self.precision_digits)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision_digits: DEFAULT_PRECISION_DIGITS,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["mandelbrot-zoom"]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.precision().digits(), 300);
        assert_eq!(config.bind_addr(), "127.0.0.1:5555");
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from([
            "mandelbrot-zoom",
            "--precision",
            "500",
            "--host",
            "0.0.0.0",
            "-p",
            "6000",
        ])
        .unwrap();
        assert_eq!(config.precision().digits(), 500);
        assert_eq!(config.bind_addr(), "0.0.0.0:6000");
    }

    #[test]
    fn zero_precision_is_rejected() {
        assert!(Config::try_parse_from(["mandelbrot-zoom", "--precision", "0"]).is_err());
    }
}
