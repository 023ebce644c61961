use std::str::FromStr;

use serde_json::Value;

use crate::error::WatchError;

/// The three review states the API documents.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict shown to the user for this status.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<HomeworkStatus, WatchError> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(WatchError::EmptyResponse(format!(
                "unknown homework status \"{other}\""
            ))),
        }
    }
}

/// Checks the decoded payload against the documented response shape and
/// returns the homework list, which may be empty.
///
/// Sole gate against malformed upstream data - no field below this point
/// may be used without having passed through here first.
pub fn check_response(payload: &Value) -> Result<&[Value], WatchError> {
    let map = payload
        .as_object()
        .ok_or_else(|| WatchError::Shape("response body is not a JSON object".to_string()))?;

    let homeworks = map.get("homeworks").ok_or_else(|| {
        WatchError::EmptyResponse("no \"homeworks\" key in response".to_string())
    })?;

    match homeworks.as_array() {
        Some(list) => Ok(list),
        None => Err(WatchError::Shape("\"homeworks\" is not a list".to_string())),
    }
}

/// Extracts the verdict message for one homework record.
/// Pure in (homework_name, status); anything missing or unrecognized is an
/// upstream contract violation.
pub fn parse_status(record: &Value) -> Result<String, WatchError> {
    let name = record
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            WatchError::EmptyResponse("no \"homework_name\" key in record".to_string())
        })?;

    let raw = record
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| WatchError::EmptyResponse("no \"status\" key in record".to_string()))?;

    let status = HomeworkStatus::from_str(raw)?;

    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}
