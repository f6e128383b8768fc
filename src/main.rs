//! マンデルブロ集合 深いズーム用 計算サービス
//!
//! フロントエンドから表示範囲とズーム倍率を受け取り、
//! 任意精度で新しい表示範囲を計算して返す。
//!
//! 使い方:
//!   mandelbrot-zoom --precision 300 --host 127.0.0.1 --port 5555
//!
//! ログの詳細度は RUST_LOG で変更できる（例: RUST_LOG=debug）。

use anyhow::{Context, Result};
use clap::Parser;
use mandelbrot_zoom::{Config, Server};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let addr = config.bind_addr();
    let server = Server::new(config);

    let listener = server
        .bind()
        .with_context(|| format!("{} で待ち受けできませんでした", addr))?;
    server
        .serve(listener)
        .context("通信エラーのためサービスを停止しました")?;
    Ok(())
}
