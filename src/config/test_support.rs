//! Shared helpers for tests that touch the filesystem or process environment

use std::fs;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

// Global mutex so tests that read or write environment variables run one at a time
static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub(crate) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Create a temporary config directory with files
pub(crate) fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
    }
    temp_dir
}

/// Sets or removes environment variables and restores them on drop
pub(crate) struct EnvGuard {
    vars_to_restore: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub(crate) fn new() -> Self {
        Self {
            vars_to_restore: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) {
        self.remember(key);
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.remember(key);
        unsafe {
            std::env::remove_var(key);
        }
    }

    fn remember(&mut self, key: &str) {
        let original = std::env::var(key).ok();
        self.vars_to_restore.push((key.to_string(), original));
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Restore in reverse so the first recorded value wins
        for (key, original_value) in self.vars_to_restore.iter().rev() {
            unsafe {
                match original_value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
