use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Build the JSON body for a success line; object `data` is merged into the top level.
pub fn success_json(message: &str, data: Option<Value>) -> Value {
    let mut response = json!({
        "success": true,
        "message": message
    });

    if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
        target.extend(extra);
    }
    response
}

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&success_json(message, data))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_object_data() {
        let value = success_json("Token issued", Some(json!({ "token": "abc" })));
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Token issued");
        assert_eq!(value["token"], "abc");
    }

    #[test]
    fn ignores_non_object_data() {
        let value = success_json("ok", Some(json!([1, 2])));
        assert_eq!(value.as_object().map(|o| o.len()), Some(2));
    }
}
