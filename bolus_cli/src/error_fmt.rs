//! Human-readable error descriptions and structured JSON error formatting.

use bolus_core::error::DoseError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(de) = err.downcast_ref::<DoseError>() {
        return match de {
            DoseError::InvalidParameter(msg) => format!(
                "What happened: Invalid parameter ({msg}).\nLikely causes: A profile value or command argument is zero, negative, or out of range.\nHow to fix: Correct the value in the profile TOML or on the command line, then rerun."
            ),
            DoseError::UnknownValue { kind, value } => format!(
                "What happened: Unknown {kind} {value:?}.\nLikely causes: A typo in the command line or profile.\nHow to fix: Run with --help to list accepted values."
            ),
        };
    }

    // String-based heuristics for errors coming from profile loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.starts_with("open profile") {
        return format!(
            "What happened: The profile file could not be read.\nLikely causes: Wrong --config path or missing read permission.\nHow to fix: Check the path and permissions. Original: {msg}"
        );
    }

    if lower.starts_with("parse profile") {
        return format!(
            "What happened: The profile file is not valid TOML for this tool.\nLikely causes: A syntax error, a misspelled unit_mode or rotation, or a value of the wrong type.\nHow to fix: Compare against etc/bolus_profile.toml. Original: {msg}"
        );
    }

    if lower.contains("profile.") || lower.starts_with("logging.") {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the profile file, then rerun. See etc/bolus_profile.toml for a sample."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Invalid parameters exit with 3; everything else with 1. Usage errors keep clap's 2.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<DoseError>() {
        Some(DoseError::InvalidParameter(_)) => 3,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<DoseError>() {
        Some(DoseError::InvalidParameter(_)) => "InvalidParameter",
        Some(DoseError::UnknownValue { .. }) => "UnknownValue",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = humanize(err);
    match err.downcast_ref::<DoseError>() {
        Some(DoseError::InvalidParameter(p)) => {
            json!({ "reason": reason_name(err), "details": { "parameter": p }, "message": msg })
        }
        Some(DoseError::UnknownValue { kind, value }) => {
            json!({ "reason": reason_name(err), "details": { "kind": kind, "value": value }, "message": msg })
        }
        None => json!({ "reason": reason_name(err), "message": msg }),
    }
    .to_string()
}
