//! 管理端站点设置

use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use serde_json::Value;

use crate::errors::AinavError;
use crate::storage::SeaOrmStorage;

use super::guard::AdminSession;
use super::helpers::{success_response, success_with_message};

/// 原始存储值，不合并默认值
pub async fn get_settings(
    _session: AdminSession,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(storage.get_settings().await?))
}

/// 批量写入；数字与布尔值按字符串保存
pub async fn update_settings(
    _session: AdminSession,
    body: web::Json<BTreeMap<String, Value>>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let values = stringify_values(body.into_inner())?;
    storage.upsert_settings(&values).await?;
    Ok(success_with_message(
        "Settings saved",
        storage.get_settings().await?,
    ))
}

fn stringify_values(raw: BTreeMap<String, Value>) -> Result<BTreeMap<String, String>, AinavError> {
    raw.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(_) | Value::Number(_) => value.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(AinavError::validation(format!(
                        "Setting '{}' must be a string",
                        key
                    )));
                }
            };
            Ok((key, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringify_values() {
        let raw: BTreeMap<String, Value> = serde_json::from_value(json!({
            "siteName": "123.SS",
            "pageSize": 24,
            "maintenance": false,
            "footer": null,
        }))
        .unwrap();

        let values = stringify_values(raw).unwrap();
        assert_eq!(values["siteName"], "123.SS");
        assert_eq!(values["pageSize"], "24");
        assert_eq!(values["maintenance"], "false");
        assert_eq!(values["footer"], "");
    }

    #[test]
    fn test_nested_value_rejected() {
        let raw: BTreeMap<String, Value> =
            serde_json::from_value(json!({"nav": {"a": 1}})).unwrap();
        assert!(stringify_values(raw).is_err());
    }
}
