//! Profile configuration persistence and session setup.

use std::path::PathBuf;
use std::{fmt, fs};

use discord_rpc::{Client, Error, EventHandlers, Library};

use super::Cli;

/// Base configuration directory for all profiles.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("discord-rpc-cli")
}

/// Configuration directory for a specific profile.
pub fn profile_dir(name: &str) -> PathBuf {
    config_dir().join(name)
}

/// Read the default profile name (falls back to `"default"`).
pub fn default_profile() -> String {
    let path = config_dir().join(".default");
    fs::read_to_string(path).map_or_else(|_| "default".into(), |s| s.trim().to_owned())
}

/// Persist the default profile name.
pub fn set_default(name: &str) -> discord_rpc::Result<()> {
    let base = config_dir();
    fs::create_dir_all(&base)?;
    fs::write(base.join(".default"), name)?;
    Ok(())
}

/// Persistent per-profile configuration stored as `profile.conf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub app_id: Option<String>,
    pub library: Option<PathBuf>,
    pub steam_id: Option<String>,
    pub auto_register: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            library: None,
            steam_id: None,
            auto_register: true,
        }
    }
}

impl ProfileConfig {
    /// Load from `<profile_dir>/profile.conf`.
    pub fn load(profile: &str) -> discord_rpc::Result<Self> {
        let text = fs::read_to_string(profile_dir(profile).join("profile.conf"))?;
        Self::parse(&text)
    }

    /// Load the profile, or defaults when it has never been saved.
    pub fn load_or_default(profile: &str) -> discord_rpc::Result<Self> {
        if profile_dir(profile).join("profile.conf").exists() {
            Self::load(profile)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse `key=value` lines. Blank lines, `#` comments and unknown keys are skipped.
    pub fn parse(text: &str) -> discord_rpc::Result<Self> {
        let mut cfg = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else {
                continue;
            };
            let v = v.trim();
            let value = (!v.is_empty()).then(|| v.to_owned());
            match k.trim() {
                "app_id" => cfg.app_id = value,
                "library" => cfg.library = value.map(PathBuf::from),
                "steam_id" => cfg.steam_id = value,
                "auto_register" => {
                    cfg.auto_register = match v {
                        "true" | "1" | "yes" => true,
                        "false" | "0" | "no" => false,
                        _ => {
                            return Err(Error::InvalidArgument(format!(
                                "profile.conf: auto_register must be true or false, got '{v}'"
                            )));
                        }
                    };
                }
                _ => {}
            }
        }
        Ok(cfg)
    }

    /// Save to `<profile_dir>/profile.conf`.
    pub fn save(&self, profile: &str) -> discord_rpc::Result<()> {
        let dir = profile_dir(profile);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("profile.conf"), self.to_string())?;
        Ok(())
    }

    /// Overlay the command-line flags.
    pub fn merge(mut self, cli: &Cli) -> Self {
        if let Some(id) = &cli.app_id {
            self.app_id = Some(id.clone());
        }
        if let Some(lib) = &cli.library {
            self.library = Some(lib.clone());
        }
        if let Some(id) = &cli.steam_id {
            self.steam_id = Some(id.clone());
        }
        if cli.no_auto_register {
            self.auto_register = false;
        }
        self
    }
}

impl fmt::Display for ProfileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "app_id={}", self.app_id.as_deref().unwrap_or_default())?;
        writeln!(
            f,
            "library={}",
            self.library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )?;
        writeln!(f, "steam_id={}", self.steam_id.as_deref().unwrap_or_default())?;
        writeln!(f, "auto_register={}", self.auto_register)
    }
}

/// Fully resolved settings for one session.
#[derive(Debug, Clone)]
pub struct Target {
    pub profile: String,
    pub app_id: String,
    pub library: Option<PathBuf>,
    pub steam_id: Option<String>,
    pub auto_register: bool,
}

impl Target {
    /// Combine the selected profile with the command-line overrides.
    pub fn resolve(cli: &Cli) -> discord_rpc::Result<Self> {
        let profile = cli.profile.clone().unwrap_or_else(default_profile);
        let cfg = ProfileConfig::load_or_default(&profile)?.merge(cli);
        let app_id = cfg.app_id.ok_or_else(|| {
            Error::InvalidArgument(format!(
                "no application id: pass --app-id or save one in profile '{profile}'"
            ))
        })?;
        Ok(Self {
            profile,
            app_id,
            library: cfg.library,
            steam_id: cfg.steam_id,
            auto_register: cfg.auto_register,
        })
    }

    /// Load the shared library this target points at.
    pub fn open_library(&self) -> discord_rpc::Result<Library> {
        match &self.library {
            Some(path) => Library::open(path),
            None => Library::load(),
        }
    }

    /// Open a session with `handlers` installed.
    pub fn connect(&self, handlers: EventHandlers) -> discord_rpc::Result<Client> {
        let native = self.open_library()?;
        tracing::info!(
            profile = %self.profile,
            app_id = %self.app_id,
            library = %native.path().display(),
            "connecting"
        );
        let mut builder = Client::builder(&self.app_id)
            .handlers(handlers)
            .auto_register(self.auto_register);
        if let Some(id) = &self.steam_id {
            builder = builder.steam_id(id);
        }
        builder.initialize(native)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_reads_known_keys() {
        let cfg = ProfileConfig::parse(
            "# saved by discord-rpc\n\
             app_id = 345229890980937739\n\
             library=/opt/rpc/libdiscord-rpc.so\n\
             steam_id=\n\
             auto_register=false\n\
             colour=blue\n",
        )
        .unwrap();
        assert_eq!(cfg.app_id.as_deref(), Some("345229890980937739"));
        assert_eq!(cfg.library, Some(PathBuf::from("/opt/rpc/libdiscord-rpc.so")));
        assert!(cfg.steam_id.is_none());
        assert!(!cfg.auto_register);
    }

    #[test]
    fn parse_rejects_bad_bool() {
        assert!(matches!(
            ProfileConfig::parse("auto_register=sometimes"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn saved_text_parses_back() {
        let cfg = ProfileConfig {
            app_id: Some("42".into()),
            library: None,
            steam_id: Some("480".into()),
            auto_register: false,
        };
        assert_eq!(ProfileConfig::parse(&cfg.to_string()).unwrap(), cfg);
    }

    #[test]
    fn flags_override_profile() {
        let cli = Cli::try_parse_from([
            "discord-rpc",
            "--app-id",
            "7",
            "--no-auto-register",
            "clear",
        ])
        .unwrap();
        let base = ProfileConfig {
            app_id: Some("1".into()),
            steam_id: Some("480".into()),
            ..ProfileConfig::default()
        };
        let merged = base.merge(&cli);
        assert_eq!(merged.app_id.as_deref(), Some("7"));
        assert_eq!(merged.steam_id.as_deref(), Some("480"));
        assert!(!merged.auto_register);
    }
}
