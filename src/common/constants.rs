//! 共通定数

/// 既定の有効桁数（10進）
pub const DEFAULT_PRECISION_DIGITS: u32 = 300;

/// 10進桁数からビット数へ変換するときに追加するガードビット
pub const GUARD_BITS: u32 = 32;

/// 10進指数の上限（|指数| がこれを超える値は受け付けない）
///
/// 平文の10進表記で送るため、応答の長さをおおよそ 有効桁数 + この値 に抑える。
pub const MAX_DECIMAL_EXPONENT: u32 = 10_000;

/// ビューポートの幅（高さ）の中に最低限残したい有効桁数
pub const MIN_RESOLVED_DIGITS: u32 = 3;

/// 脱出判定の半径の2乗（|z| > 2 ⇔ |z|^2 > 4）
pub const ESCAPE_RADIUS_SQR: u32 = 4;

/// 既定の待ち受けホスト
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// 既定の待ち受けポート
pub const DEFAULT_PORT: u16 = 5555;

/// 1メッセージの最大バイト数
pub const DEFAULT_MAX_FRAME_BYTES: usize = 1 << 20;
