use serde::{Deserialize, Serialize};

/// Name of the Java launcher binary in built command strings. Command strings
/// target the cmd dialect, so the Windows executable name is used regardless
/// of the host the builder runs on.
pub const JAVA_EXECUTABLE: &str = "java.exe";

/// One configured Java installation. `path` may point at the `java.exe`
/// binary directly or at an installation directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaEnvironment {
    pub id: String,
    pub name: String,
    pub path: String,
}

/// Configured language runtimes, loaded once at startup and passed into the
/// command builder at call time. Mutated only through the settings-save path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentConfig {
    /// Path to a Python interpreter, or empty to rely on a bare `python`
    /// lookup on the OS search path.
    pub python: String,
    /// Legacy single Java path, kept for configs written before
    /// `javaEnvironments` existed.
    pub java: String,
    pub java_environments: Vec<JavaEnvironment>,
    pub default_java_environment_id: Option<String>,
}

impl EnvironmentConfig {
    pub fn python_interpreter(&self) -> String {
        let configured = self.python.trim();
        if configured.is_empty() {
            "python".to_string()
        } else {
            configured.to_string()
        }
    }

    /// Resolve the Java launcher for an item. Precedence: the item's own
    /// environment id, then the configured default environment, then the
    /// legacy single path, then a bare `java` lookup.
    pub fn java_runtime(&self, requested_env_id: Option<&str>) -> String {
        let lookup = |id: &str| {
            self.java_environments
                .iter()
                .find(|env| env.id == id)
                .map(|env| env.path.clone())
        };

        let configured = requested_env_id
            .and_then(lookup)
            .or_else(|| self.default_java_environment_id.as_deref().and_then(lookup))
            .or_else(|| {
                let legacy = self.java.trim();
                (!legacy.is_empty()).then(|| legacy.to_string())
            });

        match configured {
            Some(path) => ensure_java_launcher(&path),
            None => "java".to_string(),
        }
    }
}

/// Append the launcher name when the configured path looks like a directory
/// rather than the executable itself.
fn ensure_java_launcher(path: &str) -> String {
    if path.to_lowercase().ends_with(JAVA_EXECUTABLE) {
        path.to_string()
    } else {
        format!("{}\\{}", path.trim_end_matches(['\\', '/']), JAVA_EXECUTABLE)
    }
}

/// Directory portion of an interpreter path, for PATH prefix injection in
/// terminal sessions. A bare program name (no separators) has no directory.
pub fn interpreter_dir(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_matches('"');
    let cut = trimmed.rfind(['\\', '/'])?;
    if cut == 0 {
        return None;
    }
    Some(trimmed[..cut].to_string())
}
