//! Session configuration.
//!
//! Everything here is fixed at process start. Only the display name and
//! the external collaborator commands can be overridden, and only through
//! the environment.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the display user name.
pub const USER_NAME_VAR: &str = "ASSISTANT_USER";
/// Environment variable overriding the device bootstrap script.
pub const DEVICE_SCRIPT_VAR: &str = "BEE_DEVICE_SCRIPT";
/// Environment variable overriding the face recognizer command.
pub const FACE_AUTH_CMD_VAR: &str = "BEE_FACE_AUTH_CMD";
/// Environment variable overriding the text-to-speech command.
pub const TTS_CMD_VAR: &str = "BEE_TTS_CMD";
/// Environment variable overriding the audio player command.
pub const SOUND_PLAYER_VAR: &str = "BEE_SOUND_PLAYER";

const KNOWN_VARS: [&str; 5] = [
    USER_NAME_VAR,
    DEVICE_SCRIPT_VAR,
    FACE_AUTH_CMD_VAR,
    TTS_CMD_VAR,
    SOUND_PLAYER_VAR,
];

/// Errors raised while loading configuration. All are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but is not valid Unicode.
    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),

    /// A command variable is set but contains no program.
    #[error("environment variable {0} is set but empty")]
    EmptyCommand(&'static str),

    /// The asset root is missing or not a directory.
    #[error("UI asset root {} is not a directory", .0.display())]
    MissingAssetRoot(PathBuf),

    /// The start page does not exist under the asset root.
    #[error("start page {} does not exist", .0.display())]
    MissingStartPage(PathBuf),
}

/// A program and its leading arguments, split on whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Splits `raw` on whitespace. Returns `None` if there is no program.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Commands for the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorConfig {
    /// Device bootstrap script, run through the platform shell.
    pub device_script: String,
    /// Face recognizer; prints its flag on stdout.
    pub face_auth: CommandLine,
    /// Text-to-speech; the text is appended as the last argument.
    pub tts: CommandLine,
    /// Audio player; the sound file is appended as the last argument.
    pub sound_player: CommandLine,
    /// Start-up cue played after a successful authentication.
    pub startup_sound: PathBuf,
}

/// Immutable settings for one launcher session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub app_name: String,
    /// Name used in the spoken welcome.
    pub user_name: String,
    /// Directory the frontend is served from.
    pub asset_root: PathBuf,
    /// Page served for `/` and opened in the companion window.
    pub start_page: String,
    pub host: String,
    pub port: u16,
    /// How long the UI may stay disconnected before the session ends.
    pub shutdown_delay: Duration,
    pub collaborators: CollaboratorConfig,
}

impl SessionConfig {
    pub const APP_NAME: &'static str = "GenAI Assistant";
    pub const DEFAULT_USER_NAME: &'static str = "User";
    pub const ASSET_ROOT: &'static str = "www";
    pub const START_PAGE: &'static str = "index.html";
    pub const HOST: &'static str = "localhost";
    pub const PORT: u16 = 8000;
    pub const SHUTDOWN_DELAY: Duration = Duration::from_secs(1);

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    /// [`ConfigError::NotUnicode`] if an override is not valid Unicode,
    /// [`ConfigError::EmptyCommand`] if a command override is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for var in KNOWN_VARS {
            match std::env::var(var) {
                Ok(value) => {
                    vars.insert(var, value);
                }
                Err(std::env::VarError::NotPresent) => {}
                Err(std::env::VarError::NotUnicode(_)) => {
                    return Err(ConfigError::NotUnicode(var));
                }
            }
        }
        Self::from_lookup(|var| vars.get(var).cloned())
    }

    /// Loads the configuration using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A blank name falls back to the default rather than greeting nobody.
        let user_name = lookup(USER_NAME_VAR)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_USER_NAME.to_string());

        let asset_root = PathBuf::from(Self::ASSET_ROOT);

        let device_script = match lookup(DEVICE_SCRIPT_VAR) {
            Some(script) if script.trim().is_empty() => {
                return Err(ConfigError::EmptyCommand(DEVICE_SCRIPT_VAR));
            }
            Some(script) => script.trim().to_string(),
            None => bee_auth::ScriptBootstrap::DEFAULT_SCRIPT.to_string(),
        };

        let collaborators = CollaboratorConfig {
            device_script,
            face_auth: command(&lookup, FACE_AUTH_CMD_VAR, defaults::FACE_AUTH)?,
            tts: command(&lookup, TTS_CMD_VAR, defaults::TTS)?,
            sound_player: command(&lookup, SOUND_PLAYER_VAR, defaults::SOUND_PLAYER)?,
            startup_sound: asset_root.join("assets").join("audio").join("start_sound.mp3"),
        };

        Ok(Self {
            app_name: Self::APP_NAME.to_string(),
            user_name,
            asset_root,
            start_page: Self::START_PAGE.to_string(),
            host: Self::HOST.to_string(),
            port: Self::PORT,
            shutdown_delay: Self::SHUTDOWN_DELAY,
            collaborators,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL the companion window opens.
    pub fn companion_url(&self) -> String {
        format!("http://{}:{}/{}", self.host, self.port, self.start_page)
    }
}

fn command<F>(lookup: &F, var: &'static str, default: &str) -> Result<CommandLine, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => CommandLine::parse(&raw).ok_or(ConfigError::EmptyCommand(var)),
        None => CommandLine::parse(default).ok_or(ConfigError::EmptyCommand(var)),
    }
}

mod defaults {
    #[cfg(windows)]
    pub const FACE_AUTH: &str = "python engine/auth/recoganize.py";
    #[cfg(not(windows))]
    pub const FACE_AUTH: &str = "python3 engine/auth/recoganize.py";

    #[cfg(target_os = "macos")]
    pub const TTS: &str = "say";
    #[cfg(not(target_os = "macos"))]
    pub const TTS: &str = "espeak";

    #[cfg(target_os = "macos")]
    pub const SOUND_PLAYER: &str = "afplay";
    #[cfg(not(target_os = "macos"))]
    pub const SOUND_PLAYER: &str = "ffplay -nodisp -autoexit -loglevel quiet";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = SessionConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.app_name, "GenAI Assistant");
        assert_eq!(config.user_name, "User");
        assert_eq!(config.asset_root, PathBuf::from("www"));
        assert_eq!(config.start_page, "index.html");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8000);
        assert_eq!(config.shutdown_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_user_name_override() {
        let config = SessionConfig::from_lookup(env(&[(USER_NAME_VAR, "Dana")])).unwrap();
        assert_eq!(config.user_name, "Dana");
    }

    #[test]
    fn test_blank_user_name_falls_back_to_default() {
        let config = SessionConfig::from_lookup(env(&[(USER_NAME_VAR, "   ")])).unwrap();
        assert_eq!(config.user_name, "User");
    }

    #[test]
    fn test_loading_twice_is_identical() {
        let vars = [(USER_NAME_VAR, "Dana"), (TTS_CMD_VAR, "espeak -v en")];
        let first = SessionConfig::from_lookup(env(&vars)).unwrap();
        let second = SessionConfig::from_lookup(env(&vars)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bind_addr_and_companion_url() {
        let config = SessionConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.bind_addr(), "localhost:8000");
        assert_eq!(config.companion_url(), "http://localhost:8000/index.html");
    }

    #[test]
    fn test_command_override_is_split_on_whitespace() {
        let config =
            SessionConfig::from_lookup(env(&[(TTS_CMD_VAR, "espeak  -v en-us -s 150")])).unwrap();
        assert_eq!(config.collaborators.tts.program, "espeak");
        assert_eq!(config.collaborators.tts.args, vec!["-v", "en-us", "-s", "150"]);
    }

    #[test]
    fn test_blank_command_override_is_fatal() {
        let err = SessionConfig::from_lookup(env(&[(FACE_AUTH_CMD_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCommand(FACE_AUTH_CMD_VAR)));
    }

    #[test]
    fn test_blank_device_script_is_fatal() {
        let err = SessionConfig::from_lookup(env(&[(DEVICE_SCRIPT_VAR, "")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCommand(DEVICE_SCRIPT_VAR)));
    }

    #[test]
    fn test_startup_sound_lives_under_asset_root() {
        let config = SessionConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(
            config.collaborators.startup_sound,
            PathBuf::from("www/assets/audio/start_sound.mp3")
        );
    }

    #[test]
    fn test_command_line_parse() {
        assert_eq!(CommandLine::parse("   "), None);
        let cmd = CommandLine::parse("say").unwrap();
        assert_eq!(cmd.program, "say");
        assert!(cmd.args.is_empty());
    }
}
