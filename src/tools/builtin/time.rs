//! Current time tool.

use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Utc};

use crate::context::ToolInvocation;
use crate::tools::tool::{Tool, ToolError, ToolOutput, optional_str};

/// Default output format.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Tool for getting the current date and time.
pub struct CurrentTimeTool;

/// Render `now` in the requested zone and format.
///
/// `timezone` accepts `UTC` (any case) or a fixed offset such as `+08:00`.
pub fn format_time(
    now: DateTime<Utc>,
    timezone: Option<&str>,
    format: Option<&str>,
) -> Result<String, ToolError> {
    let format = format.unwrap_or(DEFAULT_TIME_FORMAT);
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ToolError::InvalidParameters(format!(
            "invalid format string: {}",
            format
        )));
    }

    match timezone {
        None => Ok(now.format(format).to_string()),
        Some(tz) if tz.eq_ignore_ascii_case("utc") || tz.eq_ignore_ascii_case("z") => {
            Ok(now.format(format).to_string())
        }
        Some(tz) => {
            let offset: FixedOffset = tz.parse().map_err(|e| {
                ToolError::InvalidParameters(format!("invalid timezone '{}': {}", tz, e))
            })?;
            Ok(now.with_timezone(&offset).format(format).to_string())
        }
    }
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time, in UTC or a fixed UTC offset."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "'UTC' (default) or a fixed offset like '+08:00'"
                },
                "format": {
                    "type": "string",
                    "description": "strftime format string (default '%Y-%m-%d %H:%M:%S %Z')"
                }
            },
            "required": []
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _invocation: &ToolInvocation,
    ) -> Result<ToolOutput, ToolError> {
        let start = std::time::Instant::now();

        let text = format_time(
            Utc::now(),
            optional_str(&params, "timezone"),
            optional_str(&params, "format"),
        )?;

        Ok(ToolOutput::text(text, start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tool::ToolMessage;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_default_format_utc() {
        assert_eq!(
            format_time(fixed_now(), None, None).unwrap(),
            "2024-03-01 12:30:00 UTC"
        );
    }

    #[test]
    fn test_fixed_offset() {
        let s = format_time(fixed_now(), Some("+08:00"), Some("%H:%M %:z")).unwrap();
        assert_eq!(s, "20:30 +08:00");
    }

    #[test]
    fn test_invalid_timezone() {
        let err = format_time(fixed_now(), Some("Mars/Olympus"), None).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }

    #[test]
    fn test_invalid_format() {
        let err = format_time(fixed_now(), None, Some("%Q")).unwrap_err();
        assert!(err.to_string().contains("invalid format"));
    }

    #[tokio::test]
    async fn test_execute_without_params() {
        let out = CurrentTimeTool
            .execute(serde_json::json!({}), &ToolInvocation::default())
            .await
            .unwrap();
        match out.message {
            ToolMessage::Text(t) => assert!(t.ends_with("UTC")),
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
