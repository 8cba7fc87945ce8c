use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PathsConfig;

pub const DEFAULT_PROC_DIR: &str = "/proc";
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";
pub const DEFAULT_PASSWD: &str = "/etc/passwd";

pub const VERSION_FILENAME: &str = "version";
pub const MEMINFO_FILENAME: &str = "meminfo";
pub const UPTIME_FILENAME: &str = "uptime";
pub const STAT_FILENAME: &str = "stat";
pub const STATUS_FILENAME: &str = "status";
pub const CMDLINE_FILENAME: &str = "cmdline";

/// Reads kernel text interfaces and splits them into keyed or positional
/// records. Holds only file locations, so it is cheap to clone into every
/// component that needs it.
///
/// Every reader returns an empty value when the file cannot be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSource {
    proc_dir: PathBuf,
    os_release: PathBuf,
    passwd: PathBuf,
}

impl Default for CounterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource {
    pub fn new() -> Self {
        CounterSource {
            proc_dir: PathBuf::from(DEFAULT_PROC_DIR),
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
            passwd: PathBuf::from(DEFAULT_PASSWD),
        }
    }

    /// Lays every file out under `root` (`root/proc`, `root/etc/os-release`,
    /// `root/etc/passwd`). Used for fixture trees.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        CounterSource {
            proc_dir: root.join("proc"),
            os_release: root.join("etc").join("os-release"),
            passwd: root.join("etc").join("passwd"),
        }
    }

    pub fn from_config(paths: &PathsConfig) -> Self {
        CounterSource {
            proc_dir: PathBuf::from(&paths.proc_dir),
            os_release: PathBuf::from(&paths.os_release),
            passwd: PathBuf::from(&paths.passwd),
        }
    }

    pub fn proc_dir(&self) -> &Path {
        &self.proc_dir
    }

    pub fn os_release_path(&self) -> &Path {
        &self.os_release
    }

    pub fn passwd_path(&self) -> &Path {
        &self.passwd
    }

    pub fn proc_path(&self, name: &str) -> PathBuf {
        self.proc_dir.join(name)
    }

    pub fn pid_path(&self, pid: u32, name: &str) -> PathBuf {
        self.proc_dir.join(pid.to_string()).join(name)
    }

    /// Parses `KEY: VALUE [UNIT]` lines into a map of key to the first value
    /// token. The colon is optional so `/proc/stat` style `KEY VALUE` lines
    /// parse as well. The first occurrence of a key wins.
    pub fn read_keyed_counters(&self, path: &Path) -> HashMap<String, String> {
        read_file(path)
            .map(|contents| parse_keyed(&contents))
            .unwrap_or_default()
    }

    /// Splits the first line on whitespace. A parenthesised command name
    /// (`/proc/<pid>/stat`) stays one field even when it contains spaces.
    pub fn read_positional_fields(&self, path: &Path) -> Vec<String> {
        read_file(path)
            .and_then(|contents| contents.lines().next().map(split_positional))
            .unwrap_or_default()
    }

    /// First line of a single-scalar file, trimmed. NUL argument separators
    /// are rendered as spaces.
    pub fn read_single_value(&self, path: &Path) -> String {
        read_file(path)
            .map(|contents| first_value(&contents))
            .unwrap_or_default()
    }

    /// Every line of the file; empty when unreadable.
    pub fn read_lines(&self, path: &Path) -> Vec<String> {
        read_file(path)
            .map(|contents| contents.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Looks a numeric uid up in the account database. Returns the first
    /// matching account name, or an empty string.
    pub fn user_name(&self, uid: &str) -> String {
        if uid.is_empty() {
            return String::new();
        }
        self.read_lines(&self.passwd)
            .iter()
            .find_map(|line| match_account(line, uid))
            .unwrap_or_default()
    }

    /// Live process ids: every all-digit directory name under the proc root,
    /// in ascending order.
    pub fn process_ids(&self) -> Vec<u32> {
        let entries = match fs::read_dir(&self.proc_dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(path = %self.proc_dir.display(), %err, "process table unavailable");
                return Vec::new();
            }
        };

        let mut pids: Vec<u32> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| parse_pid(&entry.file_name().to_string_lossy()))
            .collect();
        pids.sort_unstable();
        pids
    }
}

fn read_file(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "counter file unavailable");
            None
        }
    }
}

pub fn parse_keyed(contents: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in contents.lines() {
        if let Some((key, value)) = parse_keyed_line(line) {
            map.entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    map
}

/// `MemTotal:  16314760 kB` -> `("MemTotal", "16314760")`,
/// `processes 4711` -> `("processes", "4711")`.
pub fn parse_keyed_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let (key, rest) = match line.split_once(':') {
        Some((key, rest)) if !key.contains(char::is_whitespace) => (key, rest),
        _ => line.split_once(char::is_whitespace)?,
    };
    let key = key.trim();
    let value = rest.split_whitespace().next()?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

pub fn split_positional(line: &str) -> Vec<String> {
    // pid (comm) state ppid ...
    if let (Some(open), Some(close)) = (line.find('('), line.rfind(')'))
        && open < close
    {
        let mut fields: Vec<String> = line[..open]
            .split_whitespace()
            .map(str::to_string)
            .collect();
        fields.push(line[open..=close].to_string());
        fields.extend(line[close + 1..].split_whitespace().map(str::to_string));
        return fields;
    }
    line.split_whitespace().map(str::to_string).collect()
}

fn first_value(contents: &str) -> String {
    contents
        .lines()
        .next()
        .map(|line| {
            line.split('\0')
                .filter(|arg| !arg.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn match_account(line: &str, uid: &str) -> Option<String> {
    let mut parts = line.split(':');
    let name = parts.next()?;
    let _password = parts.next()?;
    let account_uid = parts.next()?;
    (account_uid == uid && !name.is_empty()).then(|| name.to_string())
}

fn parse_pid(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}
