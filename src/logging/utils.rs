//! Log file location and timestamps.
use std::path::PathBuf;

/// Directory holding the per-command log files.
///
/// `$XDG_CACHE_HOME/chatmate`, falling back to `~/.cache/chatmate` with the
/// home directory taken from `HOME` or `USERPROFILE`.  Empty values count
/// as unset.
pub(super) fn log_dir(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let var = |key: &str| env(key).filter(|value| !value.is_empty());
    let cache = match var("XDG_CACHE_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(var("HOME").or_else(|| var("USERPROFILE"))?).join(".cache"),
    };
    Some(cache.join("chatmate"))
}

/// Log file for `command`, resolved from the process environment.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = log_dir(|key| std::env::var(key).ok())?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC time of day, `HH:MM:SS`.
pub(super) fn clock() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

/// Current UTC instant in RFC 3339 form with second precision.
pub(super) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn xdg_cache_home_wins() {
        let dir = log_dir(lookup(&[("XDG_CACHE_HOME", "/xdg"), ("HOME", "/home/u")]));
        assert_eq!(dir.as_deref(), Some(Path::new("/xdg/chatmate")));
    }

    #[test]
    fn falls_back_to_home_then_userprofile() {
        let dir = log_dir(lookup(&[("XDG_CACHE_HOME", ""), ("HOME", "/home/u")]));
        assert_eq!(dir.as_deref(), Some(Path::new("/home/u/.cache/chatmate")));

        let dir = log_dir(lookup(&[("USERPROFILE", "C:/Users/u")]));
        assert_eq!(dir.as_deref(), Some(Path::new("C:/Users/u/.cache/chatmate")));
    }

    #[test]
    fn no_home_means_no_log_file() {
        assert!(log_dir(lookup(&[])).is_none());
    }

    #[test]
    fn clock_is_hours_minutes_seconds() {
        let now = clock();
        let parts: Vec<&str> = now.split(':').collect();
        assert_eq!(parts.len(), 3, "{now}");
        assert!(parts.iter().all(|p| p.len() == 2), "{now}");
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let now = timestamp();
        assert!(now.ends_with('Z'), "{now}");
        chrono::DateTime::parse_from_rfc3339(&now).unwrap();
    }
}
