/*!
 * `{{key}}` and `{{key: default}}` template tokens.
 */

use std::fmt::Write;

use chrono::Local;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::TemplateConfig;
use crate::screenplay::document::{EditScript, Script};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{[ \t]*([A-Za-z]+)[ \t]*(?::[ \t]*([^}]*?))?[ \t]*\}\}").unwrap()
});

/// Values available to template tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    pub title: Option<String>,
    pub time: Option<String>,
    pub fullname: Option<String>,
    pub nick: Option<String>,
    pub email: Option<String>,
}

impl TemplateValues {
    /// Values from configuration, with the current local time and the
    /// caller's title
    pub fn from_config(config: &TemplateConfig, title: Option<&str>) -> Self {
        // An invalid format string makes chrono fail the write
        let mut time = String::new();
        let time = write!(time, "{}", Local::now().format(&config.time_format))
            .ok()
            .map(|_| time);

        Self {
            title: title.map(str::to_string),
            time,
            fullname: config.fullname.clone(),
            nick: config.nick.clone(),
            email: config.email.clone(),
        }
    }

    /// Value for a key, `None` for unknown keys or missing values
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key.to_lowercase().as_str() {
            "title" => &self.title,
            "time" => &self.time,
            "fullname" => &self.fullname,
            "nick" => &self.nick,
            "email" => &self.email,
            _ => return None,
        };
        value.as_deref().filter(|value| !value.is_empty())
    }
}

/// Replace every resolvable token. Tokens with neither a value nor a
/// default are left as written.
pub fn expand_templates(script: &Script, values: &TemplateValues) -> EditScript {
    let mut edits = EditScript::new();

    for captures in TOKEN.captures_iter(script.text()) {
        let Some(token) = captures.get(0) else {
            continue;
        };
        let key = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        let default = captures.get(2).map(|m| m.as_str());

        match values.get(key).or(default) {
            Some(replacement) => edits.replace(token.range(), replacement),
            None => debug!("No value for template key '{}'", key),
        }
    }

    edits
}
