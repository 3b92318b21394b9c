use crate::history::HistoryBuffer;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, user-level view of the process environment used by the interpreter.
///
/// The environment carries the per-session state:
/// - `vars`: a map of environment variables that will be visible to executed commands.
/// - `current_dir`: the working directory for command execution.
/// - `should_exit`: a flag that the interactive loop checks to know when to terminate.
/// - `history`: the bounded record of accepted commands.
///
/// Fields are public; the interpreter and the built-ins manipulate them directly.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that the interactive loop should exit.
    pub should_exit: bool,
    /// Commands accepted so far, oldest first, bounded.
    pub history: HistoryBuffer,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// This copies variables from `std::env::vars()` and initializes `current_dir`
    /// from `std::env::current_dir()`. The `should_exit` flag starts unset and
    /// the history buffer starts empty.
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        for (k, v) in stdenv::vars() {
            vars.insert(k, v);
        }
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
            history: HistoryBuffer::new(),
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Append extra directories to the captured `PATH`, colon separated.
    ///
    /// Happens once before the loop starts; child processes receive the
    /// modified map explicitly, the process-global environment is never
    /// touched. An absent `PATH` starts out empty rather than erroring.
    pub fn append_path(&mut self, dirs: impl IntoIterator<Item = String>) {
        let mut path = self.get_var("PATH").unwrap_or_default();
        for dir in dirs {
            if !path.is_empty() {
                path.push(':');
            }
            path.push_str(&dir);
        }
        self.set_var("PATH", path);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes tests that read or change the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;
    use crate::history::HistoryBuffer;
    use std::collections::HashMap;
    use std::env as stdenv;

    fn bare_env() -> Environment {
        Environment {
            vars: HashMap::new(),
            current_dir: stdenv::current_dir().unwrap(),
            should_exit: false,
            history: HistoryBuffer::new(),
        }
    }

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = bare_env();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_append_path_extends_existing_value() {
        let mut env = bare_env();
        env.set_var("PATH", "/usr/bin");

        env.append_path(vec!["/opt/tools/bin".to_string()]);

        assert_eq!(
            env.get_var("PATH"),
            Some("/usr/bin:/opt/tools/bin".to_string())
        );
    }

    #[test]
    fn test_append_path_joins_multiple_dirs_with_colons() {
        let mut env = bare_env();
        env.set_var("PATH", "/bin");

        env.append_path(vec!["/a".to_string(), "/b".to_string()]);

        assert_eq!(env.get_var("PATH"), Some("/bin:/a:/b".to_string()));
    }

    #[test]
    fn test_append_path_with_empty_path_has_no_leading_colon() {
        let mut env = bare_env();
        env.set_var("PATH", "");

        env.append_path(vec!["/only".to_string()]);

        assert_eq!(env.get_var("PATH"), Some("/only".to_string()));
    }

    #[test]
    fn test_append_path_with_no_dirs_keeps_path() {
        let mut env = bare_env();
        env.set_var("PATH", "/bin:/usr/bin");

        env.append_path(Vec::new());

        assert_eq!(env.get_var("PATH"), Some("/bin:/usr/bin".to_string()));
    }
}
