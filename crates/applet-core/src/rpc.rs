//! RPC wire types and the transport seam.
//!
//! Protocol: newline-delimited JSON. One request frame per call, one response
//! frame back.
//!
//! Request: `{"service": "...", "procedure": "...", "args": [{"type": "string", "value": "..."}]}`
//! Response: `{"ret": ...}` or `{"err_code": 1, "err_msg": "..."}`

use crate::bag::PropertyBag;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A positional argument tagged with its wire type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RpcArg {
    #[serde(rename = "string")]
    Str(Option<String>),
    #[serde(rename = "int")]
    Int(i64),
}

impl RpcArg {
    pub fn str(value: impl Into<String>) -> Self {
        RpcArg::Str(Some(value.into()))
    }

    pub fn opt_str(value: Option<&str>) -> Self {
        RpcArg::Str(value.map(|value| value.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub service: String,
    pub procedure: String,
    #[serde(default)]
    pub args: Vec<RpcArg>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcResponse {
    // `Err` is listed first: a missing `ret` would otherwise decode as null.
    Err {
        err_code: i64,
        #[serde(default)]
        err_msg: String,
    },
    Ok {
        ret: Value,
    },
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("rpc codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("{message}")]
    Remote { code: i64, message: String },
    #[error("unexpected reply to {procedure}: expected {expected}")]
    UnexpectedReply {
        procedure: String,
        expected: &'static str,
    },
    #[error("daemon closed the connection")]
    Disconnected,
}

pub fn encode_request(request: &RpcRequest) -> Result<Vec<u8>, RpcError> {
    let mut bytes = serde_json::to_vec(request)?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn decode_request(line: &str) -> Result<RpcRequest, RpcError> {
    Ok(serde_json::from_str(line.trim_end())?)
}

pub fn encode_response(response: &RpcResponse) -> Result<Vec<u8>, RpcError> {
    let mut bytes = serde_json::to_vec(response)?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn decode_response(line: &str) -> Result<RpcResponse, RpcError> {
    Ok(serde_json::from_str(line.trim_end())?)
}

impl RpcResponse {
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self {
            RpcResponse::Ok { ret } => Ok(ret),
            RpcResponse::Err { err_code, err_msg } => Err(RpcError::Remote {
                code: err_code,
                message: err_msg,
            }),
        }
    }
}

/// One named RPC service endpoint.
///
/// Implementors provide the raw `call`; the typed helpers decode the four
/// reply shapes the daemon uses.
pub trait RpcTransport {
    fn service(&self) -> &str;

    fn call(&mut self, procedure: &str, args: &[RpcArg]) -> Result<Value, RpcError>;

    fn call_int(&mut self, procedure: &str, args: &[RpcArg]) -> Result<i64, RpcError> {
        match self.call(procedure, args)? {
            Value::Number(number) => number.as_i64().ok_or_else(|| unexpected(procedure, "int")),
            _ => Err(unexpected(procedure, "int")),
        }
    }

    fn call_string(&mut self, procedure: &str, args: &[RpcArg]) -> Result<Option<String>, RpcError> {
        match self.call(procedure, args)? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            _ => Err(unexpected(procedure, "string")),
        }
    }

    fn call_object(
        &mut self,
        procedure: &str,
        args: &[RpcArg],
    ) -> Result<Option<PropertyBag>, RpcError> {
        match self.call(procedure, args)? {
            Value::Null => Ok(None),
            value @ Value::Object(_) => Ok(PropertyBag::from_value(value)),
            _ => Err(unexpected(procedure, "object")),
        }
    }

    fn call_objlist(&mut self, procedure: &str, args: &[RpcArg]) -> Result<Vec<PropertyBag>, RpcError> {
        match self.call(procedure, args)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .map(|item| PropertyBag::from_value(item).ok_or_else(|| unexpected(procedure, "object list")))
                .collect(),
            _ => Err(unexpected(procedure, "object list")),
        }
    }
}

fn unexpected(procedure: &str, expected: &'static str) -> RpcError {
    RpcError::UnexpectedReply {
        procedure: procedure.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Value);

    impl RpcTransport for Fixed {
        fn service(&self) -> &str {
            "fixed"
        }

        fn call(&mut self, _procedure: &str, _args: &[RpcArg]) -> Result<Value, RpcError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn args_are_tagged_with_wire_type() {
        let args = vec![RpcArg::str("repo-1"), RpcArg::Int(3), RpcArg::Str(None)];
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(
            value,
            json!([
                {"type": "string", "value": "repo-1"},
                {"type": "int", "value": 3},
                {"type": "string", "value": null},
            ])
        );
    }

    #[test]
    fn request_frame_is_one_line() {
        let request = RpcRequest {
            service: "sync-rpcserver".into(),
            procedure: "sync_get_repo".into(),
            args: vec![RpcArg::str("r1")],
        };
        let bytes = encode_request(&request).unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));
        assert_eq!(bytes.iter().filter(|byte| **byte == b'\n').count(), 1);
        let parsed = decode_request(std::str::from_utf8(&bytes).unwrap()).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn error_response_is_not_mistaken_for_null_ret() {
        let response = decode_response(r#"{"err_code": 500, "err_msg": "disk full"}"#).unwrap();
        assert_eq!(
            response,
            RpcResponse::Err {
                err_code: 500,
                err_msg: "disk full".into()
            }
        );
        let response = decode_response(r#"{"ret": null}"#).unwrap();
        assert_eq!(response, RpcResponse::Ok { ret: Value::Null });
    }

    #[test]
    fn remote_error_displays_daemon_message() {
        let result = RpcResponse::Err {
            err_code: 1,
            err_msg: "Repo not found".into(),
        }
        .into_result();
        assert_eq!(result.unwrap_err().to_string(), "Repo not found");
    }

    #[test]
    fn call_object_maps_null_to_none() {
        let mut transport = Fixed(Value::Null);
        assert!(transport.call_object("p", &[]).unwrap().is_none());
    }

    #[test]
    fn call_objlist_rejects_scalar_items() {
        let mut transport = Fixed(json!([{"id": "a"}, 3]));
        let err = transport.call_objlist("p", &[]).unwrap_err();
        assert!(matches!(err, RpcError::UnexpectedReply { .. }));
    }

    #[test]
    fn call_int_rejects_strings() {
        let mut transport = Fixed(json!("0"));
        assert!(transport.call_int("p", &[]).is_err());
        let mut transport = Fixed(json!(-1));
        assert_eq!(transport.call_int("p", &[]).unwrap(), -1);
    }
}
