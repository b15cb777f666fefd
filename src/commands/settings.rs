/// Commands for the flat settings namespace

use serde::Serialize;
use serde_json::Value;

use crate::{AppError, FocusFlow, Store};

/// Response from a settings command
#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub key: String,
    pub value: Value,
    pub message: String,
}

/// Interpret a command-line value: JSON if it parses, a plain string otherwise
pub fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn check_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::Usage("Setting key cannot be empty".to_string()));
    }
    Ok(())
}

/// Read a setting; unset or unreadable values come back as `null`
pub async fn get_setting<S: Store>(app: &FocusFlow<S>, key: &str) -> Result<SettingResponse, AppError> {
    check_key(key)?;
    let value = app.store().get_local(key, Value::Null).await?;

    Ok(SettingResponse {
        key: key.to_string(),
        message: format!("{} = {}", key, value),
        value,
    })
}

/// Write a setting
pub async fn set_setting<S: Store>(
    app: &FocusFlow<S>,
    key: &str,
    raw: &str,
) -> Result<SettingResponse, AppError> {
    check_key(key)?;
    let value = parse_setting_value(raw);
    app.store().set_local(key, &value).await?;

    Ok(SettingResponse {
        key: key.to_string(),
        message: format!("Set {} = {}", key, value),
        value,
    })
}

/// Remove a setting
pub async fn remove_setting<S: Store>(app: &FocusFlow<S>, key: &str) -> Result<SettingResponse, AppError> {
    check_key(key)?;
    app.store().remove_local(key).await?;

    Ok(SettingResponse {
        key: key.to_string(),
        value: Value::Null,
        message: format!("Removed {}", key),
    })
}
