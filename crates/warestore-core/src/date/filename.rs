use regex::Regex;
use std::sync::LazyLock;

static WA_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"IMG-(?P<date>[0-9]+)-WA.").unwrap());

/// Extract the digit run WhatsApp places between `IMG-` and `-WA` in exported
/// image names, e.g. `IMG-20200615-WA0001.jpg` -> `20200615`. The run is
/// returned as-is; whether it names a real date is the caller's problem.
pub fn date_token(file_name: &str) -> Option<&str> {
    WA_IMAGE
        .captures(file_name)
        .and_then(|caps| caps.name("date"))
        .map(|m| m.as_str())
}
