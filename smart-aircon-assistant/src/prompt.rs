use itertools::Itertools;
use serde_json::{json, Value};
use strum::IntoEnumIterator;

use smart_aircon_device::state::types::{ACMode, FanSpeed, TargetTemperature};
use smart_aircon_device::state::DeviceState;

use crate::Result;

fn mode_names() -> Vec<&'static str> {
    ACMode::iter().map(ACMode::name).collect()
}

fn fan_speed_names() -> Vec<&'static str> {
    FanSpeed::iter().map(FanSpeed::name).collect()
}

lazy_static! {
    /// Shape the language model is asked to answer in. Only `reply` is required.
    pub static ref RESPONSE_SCHEMA: Value = json!({
        "type": "OBJECT",
        "properties": {
            "settings": {
                "type": "OBJECT",
                "properties": {
                    "power": { "type": "BOOLEAN" },
                    "mode": { "type": "STRING", "enum": mode_names() },
                    "targetTemp": { "type": "NUMBER" },
                    "fanSpeed": { "type": "STRING", "enum": fan_speed_names() },
                    "swingVertical": { "type": "BOOLEAN" },
                    "swingHorizontal": { "type": "BOOLEAN" },
                    "ecoMode": { "type": "BOOLEAN" },
                    "sleepMode": { "type": "BOOLEAN" },
                    "turboMode": { "type": "BOOLEAN" }
                },
                "description": "The updated settings for the AC"
            },
            "reply": {
                "type": "STRING",
                "description": "A short, natural language confirmation of the action."
            }
        },
        "required": ["reply"]
    });
}

pub fn build_prompt(command: &str, current: &DeviceState) -> Result<String> {
    let state = serde_json::to_string(current)?;
    // the command is embedded as a JSON string so quotes in it stay quoted
    let command = serde_json::to_string(command)?;

    Ok(format!(
        "Current AC State: {state}\n\
         User Command: {command}\n\
         \n\
         You are a smart home assistant for an air conditioner.\n\
         Interpret the user's command and return a JSON object with the necessary state updates and a short polite reply.\n\
         \n\
         Rules:\n\
         - If the user says \"it's hot\", suggest cooling or lowering temp.\n\
         - If the user says \"quiet\", maybe suggest sleep mode or low fan.\n\
         - If the user says \"goodnight\", suggest sleep mode or timer.\n\
         - Only return fields that need to change.\n\
         - Ensure 'targetTemp' is between {min} and {max}.\n\
         - Ensure 'mode' is one of: {modes}.\n\
         - Ensure 'fanSpeed' is one of: {speeds}.\n",
        state = state,
        command = command,
        min = TargetTemperature::MIN,
        max = TargetTemperature::MAX,
        modes = mode_names().iter().join(", "),
        speeds = fan_speed_names().iter().join(", "),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_state_and_command() {
        let prompt = build_prompt("it's \"really\" hot", &DeviceState::default()).unwrap();
        assert!(prompt.contains(r#""mode":"COOL""#));
        assert!(prompt.contains(r#""targetTemp":25.0"#));
        assert!(prompt.contains(r#"User Command: "it's \"really\" hot""#));
        assert!(prompt.contains("Ensure 'mode' is one of: COOL, HEAT, DRY, FAN, AUTO."));
        assert!(prompt.contains("Ensure 'fanSpeed' is one of: AUTO, LOW, MID, HIGH, TURBO."));
        assert!(prompt.contains("between 16 and 30"));
    }

    #[test]
    fn schema_requires_only_reply() {
        assert_eq!(RESPONSE_SCHEMA["required"], json!(["reply"]));
        assert_eq!(
            RESPONSE_SCHEMA["properties"]["settings"]["properties"]["mode"]["enum"],
            json!(["COOL", "HEAT", "DRY", "FAN", "AUTO"])
        );
        assert_eq!(
            RESPONSE_SCHEMA["properties"]["settings"]["properties"]
                .as_object()
                .map(|fields| fields.len()),
            Some(9)
        );
    }
}
