//! リクエスト/レスポンスの JSON 形式
//!
//! 数値は精度を落とさないよう、すべて10進文字列でやり取りする。
//!
//! ```text
//! 要求:   {"min_re": "-2", "max_re": "1", "min_im": "-1.5", "max_im": "1.5", "zoom_level": "2"}
//! 終了:   {"terminate": true}
//! 応答:   {"new_min_re": "-1.25", "new_max_re": "0.25", "new_min_im": "-0.75", "new_max_im": "0.75"}
//! 失敗:   {"error": {"kind": "DivisionByZeroError", "message": "..."}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::number::{Number, Precision};
use crate::common::viewport::Viewport;
use crate::error::{Error, Result};

/// ズーム要求
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoomRequest {
    pub viewport: Viewport,
    pub zoom_level: Number,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Zoom(ZoomRequest),
    Terminate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomResponse {
    pub new_min_re: String,
    pub new_max_re: String,
    pub new_min_im: String,
    pub new_max_im: String,
}

impl ZoomResponse {
    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            new_min_re: viewport.min_re().to_string(),
            new_max_re: viewport.max_re().to_string(),
            new_min_im: viewport.min_im().to_string(),
            new_max_im: viewport.max_im().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: ErrorBody {
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// 1回の要求に対する応答
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Zoomed(ZoomResponse),
    Failed(ErrorResponse),
}

const FIELDS: [&str; 5] = ["min_re", "max_re", "min_im", "max_im", "zoom_level"];

/// 受信したバイト列を要求に変換する
///
/// `"terminate": true` があれば他のフィールドは見ない。
pub fn decode_request(payload: &[u8], precision: Precision) -> Result<Request> {
    let value: Value = serde_json::from_slice(payload)?;
    let Value::Object(object) = value else {
        return Err(Error::Parse("要求は JSON オブジェクトである必要があります".to_string()));
    };

    if object.get("terminate") == Some(&Value::Bool(true)) {
        return Ok(Request::Terminate);
    }

    for field in FIELDS {
        if !object.contains_key(field) {
            return Err(Error::MissingField(field));
        }
    }

    let viewport = Viewport::new(
        decimal_field(&object, "min_re", precision)?,
        decimal_field(&object, "max_re", precision)?,
        decimal_field(&object, "min_im", precision)?,
        decimal_field(&object, "max_im", precision)?,
    )?;
    let zoom_level = decimal_field(&object, "zoom_level", precision)?;

    Ok(Request::Zoom(ZoomRequest {
        viewport,
        zoom_level,
    }))
}

fn decimal_field(object: &Map<String, Value>, field: &'static str, precision: Precision) -> Result<Number> {
    match object.get(field) {
        None | Some(Value::Null) => Err(Error::MissingField(field)),
        Some(Value::String(text)) => Number::parse(text, precision)
            .map_err(|e| Error::Parse(format!("{}: {}", field, e))),
        Some(other) => Err(Error::Parse(format!(
            "{} は10進文字列である必要があります（受信値: {}）",
            field, other
        ))),
    }
}

pub fn encode_reply(reply: &Reply) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(reply)?)
}

/// クライアント側で使う要求の組み立て
pub fn encode_zoom_request(viewport: &Viewport, zoom_level: &Number) -> Result<Vec<u8>> {
    let mut object = Map::new();
    object.insert("min_re".into(), Value::String(viewport.min_re().to_string()));
    object.insert("max_re".into(), Value::String(viewport.max_re().to_string()));
    object.insert("min_im".into(), Value::String(viewport.min_im().to_string()));
    object.insert("max_im".into(), Value::String(viewport.max_im().to_string()));
    object.insert("zoom_level".into(), Value::String(zoom_level.to_string()));
    Ok(serde_json::to_vec(&Value::Object(object))?)
}

pub fn encode_terminate() -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&serde_json::json!({ "terminate": true }))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<Request> {
        decode_request(json.as_bytes(), Precision::default())
    }

    #[test]
    fn decodes_zoom_request() {
        let req = decode(
            r#"{"min_re": "-2", "max_re": "1", "min_im": "-1.5", "max_im": "1.5", "zoom_level": "2"}"#,
        )
        .unwrap();
        let Request::Zoom(zoom) = req else {
            panic!("zoom request expected");
        };
        assert_eq!(zoom.viewport.min_re().to_string(), "-2");
        assert_eq!(zoom.viewport.max_im().to_string(), "1.5");
        assert_eq!(zoom.zoom_level.to_string(), "2");
    }

    #[test]
    fn decodes_terminate() {
        assert_eq!(decode(r#"{"terminate": true}"#).unwrap(), Request::Terminate);
        // terminate が true 以外なら通常の要求として扱う
        assert!(matches!(
            decode(r#"{"terminate": false}"#),
            Err(Error::MissingField("min_re"))
        ));
    }

    #[test]
    fn missing_field() {
        let err = decode(r#"{"min_re": "-2", "max_re": "1", "min_im": "-1.5", "max_im": "1.5"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MissingField("zoom_level")));

        let err = decode(
            r#"{"min_re": null, "max_re": "1", "min_im": "-1.5", "max_im": "1.5", "zoom_level": "2"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingField("min_re")));
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(decode("not json"), Err(Error::Parse(_))));
        assert!(matches!(decode(r#"["min_re"]"#), Err(Error::Parse(_))));
        assert!(matches!(
            decode(r#"{"min_re": "x", "max_re": "1", "min_im": "-1.5", "max_im": "1.5", "zoom_level": "2"}"#),
            Err(Error::Parse(_))
        ));
        // JSON の数値は精度が落ちるので受け付けない
        assert!(matches!(
            decode(r#"{"min_re": -2, "max_re": "1", "min_im": "-1.5", "max_im": "1.5", "zoom_level": "2"}"#),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn degenerate_viewport_in_request() {
        assert!(matches!(
            decode(r#"{"min_re": "1", "max_re": "-2", "min_im": "-1.5", "max_im": "1.5", "zoom_level": "2"}"#),
            Err(Error::InvalidViewport(_))
        ));
    }

    #[test]
    fn encodes_replies() {
        let vp = Viewport::parse("-1.25", "0.25", "-0.75", "0.75", Precision::default()).unwrap();
        let bytes = encode_reply(&Reply::Zoomed(ZoomResponse::from_viewport(&vp))).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "new_min_re": "-1.25",
                "new_max_re": "0.25",
                "new_min_im": "-0.75",
                "new_max_im": "0.75"
            })
        );

        let err = Error::DivisionByZero("zoom_level が 0 です");
        let bytes = encode_reply(&Reply::Failed(ErrorResponse::from(&err))).unwrap();
        let reply: Reply = serde_json::from_slice(&bytes).unwrap();
        let Reply::Failed(failed) = reply else {
            panic!("error reply expected");
        };
        assert_eq!(failed.error.kind, "DivisionByZeroError");
    }

    #[test]
    fn client_request_is_decodable() {
        let p = Precision::default();
        let vp = Viewport::parse("-2", "1", "-1.5", "1.5", p).unwrap();
        let zoom = Number::parse("2", p).unwrap();
        let bytes = encode_zoom_request(&vp, &zoom).unwrap();
        assert_eq!(
            decode_request(&bytes, p).unwrap(),
            Request::Zoom(ZoomRequest { viewport: vp, zoom_level: zoom })
        );
        assert_eq!(decode_request(&encode_terminate().unwrap(), p).unwrap(), Request::Terminate);
    }
}
