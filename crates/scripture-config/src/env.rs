use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` and `{{ env.VAR | default("x") }}` placeholders
///
/// Runs on the raw TOML text before deserialization. Comment lines are copied
/// unchanged, so a commented-out placeholder never needs its variable set.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&expand_line(line)?);
        }
    }

    Ok(output)
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*(?P<key>[a-zA-Z0-9_.]+)\s*(?:\|\s*default\("(?P<default>[^"]*)"\))?\s*\}\}"#)
            .expect("placeholder pattern is valid")
    })
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(line.len());
    let mut copied_up_to = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let key = captures.name("key").map_or("", |m| m.as_str());
        let default = captures.name("default").map(|m| m.as_str());

        expanded.push_str(&line[copied_up_to..whole.start()]);
        expanded.push_str(&resolve(key, default)?);
        copied_up_to = whole.end();
    }

    expanded.push_str(&line[copied_up_to..]);
    Ok(expanded)
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, String> {
    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.is_empty() && !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match std::env::var(var_name) {
        Ok(value) => Ok(value),
        Err(_) => default
            .map(ToOwned::to_owned)
            .ok_or_else(|| format!("environment variable not found: `{var_name}`")),
    }
}
