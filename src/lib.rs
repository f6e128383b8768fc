//! 深いズームのためのマンデルブロ集合 任意精度計算ライブラリ
//!
//! - [`common`]: 任意精度の数値、複素数、ビューポート再計算、エスケープタイム
//! - [`server`]: ズーム要求に応える同期リクエスト/リプライのサービス

pub mod common;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod transport;

pub use common::complex::ComplexPair;
pub use common::mandelbrot::{escape_time, escape_time_batch, escape_time_fast};
pub use common::number::{Number, Precision};
pub use common::viewport::{rescale, Viewport};
pub use config::Config;
pub use error::{Error, Result};
pub use server::Server;
