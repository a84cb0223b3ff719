#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:literal, $state:ty, $request:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[actix_web::post($url)]
                async fn $func_name(
                    state: actix_web::web::Data<$state>,
                    info: actix_web::web::Json<$request>,
                ) -> Result<actix_web::HttpResponse, $crate::protocol::ApiError> {
                    let response = [<$func_name _impl>](state, info.into_inner()).await?;
                    Ok(actix_web::HttpResponse::Ok().json(response))
                }
            }
        )+
    };
}

#[macro_export]
macro_rules! get_funcs {
    ( $( ( $func_name:ident, $url:literal, $state:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[actix_web::get($url)]
                async fn $func_name(
                    state: actix_web::web::Data<$state>,
                ) -> Result<actix_web::HttpResponse, $crate::protocol::ApiError> {
                    let response = [<$func_name _impl>](state).await?;
                    Ok(actix_web::HttpResponse::Ok().json(response))
                }
            }
        )+
    };
}

use blake2::{Blake2b, Digest};
use chrono::NaiveDateTime;
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

pub fn format_time_str(time: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

    format!("{}+00:00", time.format(TIME_FMT))
}

pub fn hash_password<S: AsRef<[u8]>>(password: S) -> String {
    format!("{:x}", Blake2b::digest(password.as_ref()))
}

/// Accepts a JSON string, number or boolean as text. Absent and `null` both
/// decode to `None`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected text, found {}",
            json_kind(&other)
        ))),
    }
}

/// Keeps an explicit `null` distinguishable from an absent key.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_text")]
        text: Option<String>,
        #[serde(default, deserialize_with = "present")]
        raw: Option<Value>,
    }

    fn probe(value: Value) -> Result<Probe, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn lenient_text_accepts_scalars() {
        assert_eq!(probe(json!({ "text": "abc" })).unwrap().text.as_deref(), Some("abc"));
        assert_eq!(probe(json!({ "text": 5551234 })).unwrap().text.as_deref(), Some("5551234"));
        assert_eq!(probe(json!({ "text": true })).unwrap().text.as_deref(), Some("true"));
    }

    #[test]
    fn lenient_text_treats_null_as_absent() {
        assert_eq!(probe(json!({ "text": null })).unwrap().text, None);
        assert_eq!(probe(json!({})).unwrap().text, None);
    }

    #[test]
    fn lenient_text_rejects_containers() {
        let err = probe(json!({ "text": ["a"] })).unwrap_err();
        assert!(err.to_string().contains("expected text, found array"));
    }

    #[test]
    fn present_keeps_null() {
        assert_eq!(probe(json!({ "raw": null })).unwrap().raw, Some(Value::Null));
        assert_eq!(probe(json!({})).unwrap().raw, None);
    }

    #[test]
    fn format_time_str_is_iso8601_utc() {
        let time = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_micro_opt(9, 30, 5, 42)
            .unwrap();
        assert_eq!(format_time_str(&time), "2026-10-18T09:30:05.000042+00:00");
    }

    #[test]
    fn hash_password_is_stable_hex() {
        let digest = hash_password("2003");
        assert_eq!(digest.len(), 128);
        assert_eq!(digest, hash_password("2003"));
        assert_ne!(digest, hash_password("2004"));
    }
}
