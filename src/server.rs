//! 同期リクエスト/リプライのサービスループ
//!
//! 1つの要求を受け取り、計算を終えて応答を送ってから次の要求を待つ。
//! 接続も1つずつ順番に処理する。

use std::io::{Read, Write};
use std::net::TcpListener;

use tracing::{debug, info, warn};

use crate::common::number::Precision;
use crate::common::viewport::Viewport;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::protocol::{decode_request, encode_reply, ErrorResponse, Reply, Request, ZoomRequest, ZoomResponse};
use crate::transport::{discard_payload, read_frame, write_frame};

/// 1接続分の処理が終わった理由
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Session {
    /// 相手が接続を閉じた
    Closed,
    /// 終了要求を受け取った
    Terminated,
}

pub struct Server {
    config: Config,
    precision: Precision,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let precision = config.precision();
        Self { config, precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// ズーム要求を計算する
    pub fn zoom(&self, request: &ZoomRequest) -> Result<Viewport> {
        let viewport = request.viewport.rescale(&request.zoom_level)?;
        if !viewport.is_resolvable() {
            warn!(
                precision = self.precision.digits(),
                "ビューポートが設定精度の限界に達しました。--precision を増やしてください"
            );
        }
        Ok(viewport)
    }

    /// 受信した1メッセージを処理する
    ///
    /// 終了要求なら `Ok(None)`。解析やズームの失敗はエラー応答として返し、
    /// 呼び出し側には伝えない。
    pub fn handle(&self, payload: &[u8]) -> Result<Option<Reply>> {
        let outcome = decode_request(payload, self.precision).and_then(|request| match request {
            Request::Terminate => Ok(None),
            Request::Zoom(zoom) => {
                debug!(
                    min_re = %zoom.viewport.min_re(),
                    max_re = %zoom.viewport.max_re(),
                    min_im = %zoom.viewport.min_im(),
                    max_im = %zoom.viewport.max_im(),
                    zoom_level = %zoom.zoom_level,
                    "ズーム要求"
                );
                self.zoom(&zoom).map(Some)
            }
        });

        match outcome {
            Ok(None) => {
                info!("終了要求を受信しました");
                Ok(None)
            }
            Ok(Some(viewport)) => Ok(Some(Reply::Zoomed(ZoomResponse::from_viewport(&viewport)))),
            Err(e) if e.is_recoverable() => {
                warn!(kind = e.kind(), "要求を処理できませんでした: {}", e);
                Ok(Some(Reply::Failed(ErrorResponse::from(&e))))
            }
            Err(e) => Err(e),
        }
    }

    /// 1つのストリームで要求と応答を繰り返す
    ///
    /// 上限を超えるメッセージは本体を読み捨て、[`Error::Parse`] の応答を返して続ける。
    pub fn serve_stream<S: Read + Write>(&self, stream: &mut S) -> Result<Session> {
        loop {
            let reply = match read_frame(stream, self.config.max_frame_bytes) {
                Ok(Some(payload)) => match self.handle(&payload)? {
                    Some(reply) => reply,
                    None => return Ok(Session::Terminated),
                },
                Ok(None) => return Ok(Session::Closed),
                Err(Error::FrameTooLarge { size, limit }) => {
                    discard_payload(stream, size)?;
                    let err = Error::Parse(format!(
                        "メッセージが大きすぎます: {} バイト (上限 {} バイト)",
                        size, limit
                    ));
                    warn!(kind = err.kind(), "要求を処理できませんでした: {}", err);
                    Reply::Failed(ErrorResponse::from(&err))
                }
                Err(e) => return Err(e),
            };
            write_frame(stream, &encode_reply(&reply)?)?;
        }
    }

    pub fn bind(&self) -> Result<TcpListener> {
        Ok(TcpListener::bind(self.config.bind_addr())?)
    }

    /// 終了要求を受け取るまで接続を順番に処理する
    pub fn serve(&self, listener: TcpListener) -> Result<()> {
        info!(
            addr = %listener.local_addr()?,
            precision = self.precision.digits(),
            "待ち受けを開始しました"
        );
        for stream in listener.incoming() {
            let mut stream = stream?;
            let peer = stream.peer_addr()?;
            debug!(%peer, "接続");
            match self.serve_stream(&mut stream)? {
                Session::Closed => debug!(%peer, "切断"),
                Session::Terminated => break,
            }
        }
        info!("終了しました");
        Ok(())
    }
}
