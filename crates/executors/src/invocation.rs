//! Builds shell-invocation strings from items and environment config.
//!
//! Built command strings use the cmd dialect exclusively; the runner decides
//! how to hand them to the host shell.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    env::{EnvironmentConfig, JAVA_EXECUTABLE, interpreter_dir},
    error::ExecutorError,
    item::{ItemType, LaunchableItem},
};

/// Sequential-execution operator used to join multi-line commands.
const COMMAND_SEPARATOR: &str = " & ";

/// Leading absolute-path segment: a drive-letter path or a UNC path.
static ABSOLUTE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z]:\\[^/:*?"<>|]+|\\\\[^/:*?"<>|]+)"#).expect("valid path pattern")
});

/// Trailing filename segment of a path.
static TRAILING_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\/][^\\/]+$").expect("valid segment pattern"));

/// Quoted java.exe path embedded in a raw command string.
static EMBEDDED_JAVA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)"([^"]*java\.exe)""#).expect("valid java pattern"));

/// A fully built shell command plus the directory it should run from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub command: String,
    pub working_dir: Option<String>,
}

/// What the orchestrator should do with an item: hand it to the OS "open"
/// association, or run a shell command. `path_prefix` is the interpreter
/// directory injected into PATH for terminal sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    OpenUrl(String),
    OpenPath(String),
    Shell {
        invocation: ShellInvocation,
        path_prefix: Option<String>,
    },
}

/// Build the launch plan for an item. Validates the forbidden-character
/// invariant first; a violation is a build-time rejection, never a spawn.
pub fn build(item: &LaunchableItem, env: &EnvironmentConfig) -> Result<LaunchPlan, ExecutorError> {
    item.validate()?;

    match item.item_type {
        ItemType::Url => Ok(LaunchPlan::OpenUrl(normalize_url(item.command.trim()))),
        ItemType::File | ItemType::Folder => Ok(LaunchPlan::OpenPath(item.command.clone())),
        ItemType::Command => {
            let command = join_command_lines(&item.command);
            Ok(LaunchPlan::Shell {
                path_prefix: sniff_path_prefix(&command, env),
                invocation: ShellInvocation {
                    command,
                    working_dir: working_directory_of(&item.command),
                },
            })
        }
        ItemType::Python => {
            let interpreter = env.python_interpreter();
            let script = item.command.trim();
            let path_prefix = if env.python.trim().is_empty() {
                None
            } else {
                interpreter_dir(&interpreter)
            };
            Ok(LaunchPlan::Shell {
                invocation: ShellInvocation {
                    command: format!("\"{interpreter}\" \"{script}\"{}", item.params_suffix()),
                    working_dir: working_directory_of(script),
                },
                path_prefix,
            })
        }
        ItemType::Java => {
            let launcher = env.java_runtime(item.java_environment_id.as_deref());
            let jar = item.command.trim();
            let path_prefix = if launcher == "java" {
                None
            } else {
                interpreter_dir(&launcher)
            };
            Ok(LaunchPlan::Shell {
                invocation: ShellInvocation {
                    command: format!(
                        "\"{launcher}\" -Dfile.encoding=utf-8{} -jar \"{jar}\"",
                        item.params_suffix()
                    ),
                    working_dir: working_directory_of(jar),
                },
                path_prefix,
            })
        }
        ItemType::Application => Ok(LaunchPlan::Shell {
            invocation: ShellInvocation {
                command: format!("\"{}\"{}", item.command.trim(), item.params_suffix()),
                working_dir: None,
            },
            path_prefix: None,
        }),
        ItemType::Unknown => Err(ExecutorError::UnsupportedItemType),
    }
}

/// Prepend https:// when the URL carries no scheme.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Join the non-blank lines of a multi-line command with the shell's
/// sequential-execution operator, preserving line order.
fn join_command_lines(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join(COMMAND_SEPARATOR)
}

/// Derive a working directory from the leading absolute-path segment of a
/// raw command string: the matched path minus its trailing filename segment.
/// Returns None when the string does not start with an absolute path.
pub fn working_directory_of(raw: &str) -> Option<String> {
    let caps = ABSOLUTE_PATH_RE.captures(raw)?;
    let full = caps.get(1)?.as_str();
    let dir = TRAILING_SEGMENT_RE.replace(full, "");
    if dir.is_empty() {
        None
    } else {
        Some(dir.into_owned())
    }
}

/// For raw `command` items run in a terminal: guess which interpreter the
/// command relies on and return its directory for PATH prefix injection.
fn sniff_path_prefix(command: &str, env: &EnvironmentConfig) -> Option<String> {
    if command.contains(".py") && !env.python.trim().is_empty() {
        return interpreter_dir(&env.python);
    }
    if command.contains(JAVA_EXECUTABLE) || command.contains(".jar") {
        if let Some(caps) = EMBEDDED_JAVA_RE.captures(command) {
            return Some(java_dir_of(caps.get(1)?.as_str()));
        }
        if !env.java.trim().is_empty() {
            return Some(java_dir_of(&env.java));
        }
        if let Some(default) = env
            .default_java_environment_id
            .as_deref()
            .and_then(|id| env.java_environments.iter().find(|e| e.id == id))
        {
            return Some(java_dir_of(&default.path));
        }
    }
    None
}

/// Directory to put on PATH for a configured Java location: the parent when
/// the path names the launcher itself, the path as-is when it is a directory.
fn java_dir_of(path: &str) -> String {
    if path.to_lowercase().ends_with(JAVA_EXECUTABLE) {
        interpreter_dir(path).unwrap_or_else(|| path.to_string())
    } else {
        path.trim_end_matches(['\\', '/']).to_string()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::env::JavaEnvironment;

    fn item(item_type: ItemType, command: &str) -> LaunchableItem {
        LaunchableItem {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            item_type,
            command: command.to_string(),
            launch_params: None,
            run_in_terminal: false,
            java_environment_id: None,
        }
    }

    fn shell_of(plan: LaunchPlan) -> (ShellInvocation, Option<String>) {
        match plan {
            LaunchPlan::Shell {
                invocation,
                path_prefix,
            } => (invocation, path_prefix),
            other => panic!("expected shell plan, got {other:?}"),
        }
    }

    #[test]
    fn url_gets_scheme_prepended() {
        let plan = build(&item(ItemType::Url, "example.com"), &EnvironmentConfig::default()).unwrap();
        assert_eq!(plan, LaunchPlan::OpenUrl("https://example.com".to_string()));

        let plan = build(
            &item(ItemType::Url, "http://example.com"),
            &EnvironmentConfig::default(),
        )
        .unwrap();
        assert_eq!(plan, LaunchPlan::OpenUrl("http://example.com".to_string()));
    }

    #[test]
    fn file_and_folder_pass_the_raw_path_through() {
        let plan = build(
            &item(ItemType::Folder, r"C:\tools"),
            &EnvironmentConfig::default(),
        )
        .unwrap();
        assert_eq!(plan, LaunchPlan::OpenPath(r"C:\tools".to_string()));
    }

    #[test]
    fn multi_line_commands_join_in_order_and_drop_blanks() {
        let raw = "ipconfig /all\n\n   \nwhoami\nhostname";
        let (invocation, _) = shell_of(
            build(&item(ItemType::Command, raw), &EnvironmentConfig::default()).unwrap(),
        );
        assert_eq!(invocation.command, "ipconfig /all & whoami & hostname");
    }

    #[test]
    fn working_directory_comes_from_the_leading_absolute_path() {
        assert_eq!(
            working_directory_of(r"C:\tools\run.py"),
            Some(r"C:\tools".to_string())
        );
        assert_eq!(
            working_directory_of(r"C:\tools\sub dir\app.exe -v"),
            Some(r"C:\tools\sub dir".to_string())
        );
        assert_eq!(working_directory_of("whoami"), None);
        assert_eq!(working_directory_of(""), None);
    }

    #[test]
    fn python_build_quotes_interpreter_and_script() {
        let mut env = EnvironmentConfig::default();
        let mut py = item(ItemType::Python, r"C:\tools\scan.py");
        py.launch_params = Some("-t 10".to_string());

        let (invocation, prefix) = shell_of(build(&py, &env).unwrap());
        assert_eq!(invocation.command, "\"python\" \"C:\\tools\\scan.py\" -t 10");
        assert_eq!(invocation.working_dir, Some(r"C:\tools".to_string()));
        assert_eq!(prefix, None);

        env.python = r"C:\Python311\python.exe".to_string();
        let (invocation, prefix) = shell_of(build(&py, &env).unwrap());
        assert_eq!(
            invocation.command,
            "\"C:\\Python311\\python.exe\" \"C:\\tools\\scan.py\" -t 10"
        );
        assert_eq!(prefix, Some(r"C:\Python311".to_string()));
    }

    #[test]
    fn java_build_injects_charset_override_and_jar_flag() {
        let env = EnvironmentConfig {
            java_environments: vec![JavaEnvironment {
                id: "17".to_string(),
                name: "jdk17".to_string(),
                path: r"C:\jdk17\bin".to_string(),
            }],
            default_java_environment_id: Some("17".to_string()),
            ..Default::default()
        };
        let mut jar = item(ItemType::Java, r"C:\tools\burp.jar");
        jar.launch_params = Some("-Xmx2g".to_string());

        let (invocation, prefix) = shell_of(build(&jar, &env).unwrap());
        assert_eq!(
            invocation.command,
            "\"C:\\jdk17\\bin\\java.exe\" -Dfile.encoding=utf-8 -Xmx2g -jar \"C:\\tools\\burp.jar\""
        );
        assert_eq!(invocation.working_dir, Some(r"C:\tools".to_string()));
        assert_eq!(prefix, Some(r"C:\jdk17\bin".to_string()));
    }

    #[test]
    fn application_path_is_always_quoted() {
        let mut app = item(ItemType::Application, r"C:\Program Files\tool\tool.exe");
        app.launch_params = Some("--fast".to_string());
        let (invocation, _) = shell_of(build(&app, &EnvironmentConfig::default()).unwrap());
        assert_eq!(
            invocation.command,
            "\"C:\\Program Files\\tool\\tool.exe\" --fast"
        );
    }

    #[test]
    fn forbidden_characters_reject_before_building() {
        let bad = item(ItemType::Command, "echo a | b");
        assert!(matches!(
            build(&bad, &EnvironmentConfig::default()),
            Err(ExecutorError::ForbiddenCharacter('|'))
        ));
    }

    #[test]
    fn command_sniffing_finds_embedded_java_path() {
        let env = EnvironmentConfig::default();
        let prefix = sniff_path_prefix(r#""C:\jdk8\bin\java.exe" -jar "C:\t\a.jar""#, &env);
        assert_eq!(prefix, Some(r"C:\jdk8\bin".to_string()));
    }
}
