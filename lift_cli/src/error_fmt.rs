//! Human-readable error descriptions and structured JSON error formatting.

use lift_core::error::{BuildError, LiftError};

fn find<T: std::error::Error + 'static>(err: &eyre::Report) -> Option<&T> {
    err.chain().find_map(|c| c.downcast_ref::<T>())
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = find::<BuildError>(err) {
        return match be {
            BuildError::MissingInput => {
                "What happened: No button input was provided to the controller.\nLikely causes: The button panel failed to initialize or was not wired into the builder.\nHow to fix: Ensure the panel is created successfully and passed via with_input(...).".to_string()
            }
            BuildError::MissingIndicator => {
                "What happened: No indicator was provided to the controller.\nLikely causes: The lamp outputs failed to initialize or were not wired into the builder.\nHow to fix: Ensure the lamps are created successfully and passed via with_indicator(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(le) = find::<LiftError>(err) {
        return match le {
            LiftError::Config(msg) if msg.contains("press script CSV must have headers") => {
                "Invalid headers in press script CSV. Expected 'at_ms,floor,hold_ms'.".to_string()
            }
            LiftError::Config(msg) if msg.contains("press script") => format!(
                "What happened: The press script was rejected ({msg}).\nLikely causes: A floor outside the building, a zero hold, or rows out of time order.\nHow to fix: Fix the CSV rows and rerun."
            ),
            LiftError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
            LiftError::Hardware(msg) | LiftError::HardwareFault(msg) => format!(
                "What happened: A button or lamp could not be accessed ({msg}).\nLikely causes: Wrong pin numbers, wiring faults, or missing GPIO permissions.\nHow to fix: Check the [pins] section and the wiring, then run `lift self-check`."
            ),
            LiftError::State(msg) => format!(
                "What happened: The controller reached an invalid state ({msg}).\nLikely causes: A floor without a wired button or lamp, or a backend reporting unexpected floors.\nHow to fix: Check that [pins] lists one button and one lamp per floor."
            ),
        };
    }

    if find::<toml::de::Error>(err).is_some() {
        return format!(
            "What happened: The config file is not valid TOML for this controller.\nLikely causes: A typo, a missing [building] or [pins] section, or a value of the wrong type.\nHow to fix: Compare the file with the sample config. Parser said: {}",
            err.root_cause()
        );
    }

    // String-based heuristics for errors coming from init
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("open button pins") || lower.contains("open lamp pins") {
        return "What happened: Failed to initialize GPIO pins.\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access GPIO.".to_string();
    }

    if lower.contains("read config file") {
        return format!(
            "What happened: The config file could not be read ({}).\nHow to fix: Pass an existing file with --config.",
            err.root_cause()
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

/// Stable short name of the error kind, used in JSON output.
pub fn error_kind(err: &eyre::Report) -> &'static str {
    if find::<BuildError>(err).is_some() || find::<toml::de::Error>(err).is_some() {
        return "Config";
    }
    match find::<LiftError>(err) {
        Some(LiftError::Config(_)) => "Config",
        Some(LiftError::Hardware(_) | LiftError::HardwareFault(_)) => "Hardware",
        Some(LiftError::State(_)) => "State",
        None => "Error",
    }
}

/// Map error kinds to stable exit codes; anything unclassified returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match error_kind(err) {
        "Config" => 2,
        "Hardware" => 3,
        "State" => 4,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": error_kind(err), "message": humanize(err) }).to_string()
}
