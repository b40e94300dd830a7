use crate::Result;
use ohno::app_err;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("invalid regex"));

/// Named values substituted into report and norm templates.
pub type Parameters = HashMap<&'static str, String>;

/// Replace every `{name}` placeholder in `template` by its parameter.
///
/// # Errors
///
/// Returns an error naming the first placeholder without a parameter.
pub fn render(template: &str, parameters: &Parameters) -> Result<String> {
    if let Some(missing) = PLACEHOLDER_REGEX
        .captures_iter(template)
        .map(|captures| captures.get(1).map_or("", |m| m.as_str()))
        .find(|name| !parameters.contains_key(*name))
    {
        return Err(app_err!("template '{template}' refers to unknown parameter '{missing}'"));
    }

    Ok(PLACEHOLDER_REGEX
        .replace_all(template, |captures: &Captures<'_>| {
            parameters.get(&captures[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters() -> Parameters {
        let mut parameters = Parameters::new();
        let _ = parameters.insert("name", "Core".to_string());
        let _ = parameters.insert("value", "12".to_string());
        let _ = parameters.insert("unit", "bugs".to_string());
        parameters
    }

    #[test]
    fn test_render() {
        assert_eq!(
            render("{name} has {value} {unit}.", &parameters()).unwrap(),
            "Core has 12 bugs."
        );
        assert_eq!(render("No placeholders", &parameters()).unwrap(), "No placeholders");
        assert_eq!(render("{value}{value}", &parameters()).unwrap(), "1212");
    }

    #[test]
    fn test_unknown_parameter_fails() {
        let err = render("{name} has {velocity}", &parameters()).unwrap_err();
        assert!(err.to_string().contains("velocity"));
    }
}
