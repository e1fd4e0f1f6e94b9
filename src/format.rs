//! The JSON payload of a notification.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::{EventType, Param, ParamValue, Params};

/// Split a `host;port` address into its host and numeric port.
fn split_address(addr: &str) -> (&str, Option<u32>) {
    match addr.split_once(';') {
        Some((host, port)) => (host, port.trim().parse().ok()),
        None => (addr, None),
    }
}

fn insert_address(object: &mut Map<String, Value>, host_key: &str, port_key: &str, addr: &str) {
    let (host, port) = split_address(addr);
    object.insert(host_key.to_string(), Value::from(host));
    if let Some(port) = port {
        object.insert(port_key.to_string(), Value::from(port));
    }
}

/// Serialize the filled parameters of an event as a compact JSON object.
///
/// The object starts with `"event"`, then has one member per filled parameter in parameter
/// order. Addresses are split in two members: `clientIP` and `clientPort`, `serverDomain` and
/// `serverPort`.
///
/// ```
/// # use imap_notify::format::to_json;
/// # use imap_notify::types::{EventType, Param, Params};
/// let mut params = Params::new();
/// params.fill_int(Param::Pid, 1234);
/// params.fill_str(Param::Uri, "imap://localhost/");
/// params.fill_str(Param::ServerAddress, "10.0.0.1;993");
/// assert_eq!(
///     to_json(EventType::Login, &params).unwrap(),
///     r#"{"event":"Login","serverDomain":"10.0.0.1","serverPort":993,"uri":"imap://localhost/","pid":1234}"#
/// );
/// ```
pub fn to_json(ty: EventType, params: &Params) -> Result<String> {
    let mut object = Map::new();
    object.insert("event".to_string(), Value::from(ty.name()));

    for (&param, value) in params {
        match (param, value) {
            (Param::ClientAddress, ParamValue::Str(addr)) => {
                insert_address(&mut object, "clientIP", "clientPort", addr)
            }
            (Param::ServerAddress, ParamValue::Str(addr)) => {
                insert_address(&mut object, "serverDomain", "serverPort", addr)
            }
            (_, ParamValue::Str(s)) => {
                object.insert(param.name().to_string(), Value::from(s.as_str()));
            }
            (_, ParamValue::Int(i)) => {
                object.insert(param.name().to_string(), Value::from(*i));
            }
            (_, ParamValue::Array(items)) => {
                object.insert(param.name().to_string(), Value::from(items.clone()));
            }
        }
    }

    Ok(serde_json::to_string(&Value::Object(object))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_filled_param_once() {
        let mut params = Params::new();
        for param in Param::ALL {
            if matches!(param, Param::ClientAddress | Param::ServerAddress) {
                continue;
            }
            match param.kind() {
                crate::types::ParamKind::String => params.fill_str(param, param.name()),
                crate::types::ParamKind::Integer => params.fill_int(param, 1),
                crate::types::ParamKind::StringArray => {
                    params.fill_array(param, vec!["a".to_string()])
                }
            }
        }
        params.unfill(Param::Modseq);

        let json = to_json(EventType::MessageExpunge, &params).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        let mut expected = vec!["event"];
        expected.extend(params.iter().map(|(p, _)| p.name()));
        assert_eq!(keys, expected);
        assert!(!object.contains_key("modseq"));
        assert_eq!(object["vnd.cmu.midset"], serde_json::json!(["a"]));
        assert_eq!(object["pid"], serde_json::json!(1));
    }

    #[test]
    fn addresses_are_split() {
        let mut params = Params::new();
        params.fill_str(Param::ClientAddress, "192.0.2.7;51234");
        params.fill_str(Param::ServerAddress, "imap.example.com;143");
        let json = to_json(EventType::Logout, &params).unwrap();
        assert_eq!(
            json,
            r#"{"event":"Logout","serverDomain":"imap.example.com","serverPort":143,"clientIP":"192.0.2.7","clientPort":51234}"#
        );
    }

    #[test]
    fn address_without_port() {
        let mut params = Params::new();
        params.fill_str(Param::ClientAddress, "192.0.2.7");
        let json = to_json(EventType::Login, &params).unwrap();
        assert_eq!(json, r#"{"event":"Login","clientIP":"192.0.2.7"}"#);
    }
}
