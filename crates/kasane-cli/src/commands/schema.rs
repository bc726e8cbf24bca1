use anyhow::Result;
use kasane_core::schema::{list_groups, lookup};
use serde_json::{Value, json};

/// Registry as JSON: groups in display order, each with its full command
/// specs.
pub fn registry_json() -> Result<Value> {
    let groups = list_groups()
        .iter()
        .map(|(group, names)| {
            let commands = names
                .iter()
                .map(|name| Ok(serde_json::to_value(lookup(name)?)?))
                .collect::<Result<Vec<Value>>>()?;
            Ok(json!({
                "group": group,
                "label": group.label(),
                "commands": commands,
            }))
        })
        .collect::<Result<Vec<Value>>>()?;

    Ok(json!({ "groups": groups }))
}

pub fn print() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&registry_json()?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_json_lists_every_command() {
        let value = registry_json().unwrap();
        let groups = value["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 3);

        let total: usize = groups
            .iter()
            .map(|g| g["commands"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, 13);

        let create_key = &groups[1]["commands"][0];
        assert_eq!(create_key["name"], "createKey");
        assert_eq!(create_key["fields"][2]["name"], "keyType");
        assert_eq!(create_key["fields"][2]["kind"], "select");
    }
}
