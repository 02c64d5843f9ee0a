use crate::config::Config;
use crate::services::process_watch::{liveness, ProcessProbe};
use crate::services::{ProfileStore, StorePaths, SystemProbe};
use crate::utils::{format_path_for_display, get_profile_config_path};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

/// Switch between named EVE launcher profiles and back up their state
#[derive(Parser, Debug)]
#[command(name = "eve-launch-manager", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List profiles, marking the active one
    List,
    /// Make a profile active
    Switch {
        /// Profile to switch to
        name: String,
    },
    /// Create a new profile
    Create {
        /// Name of the new profile
        name: String,
        /// Profile to copy settings from (empty profile if omitted)
        #[arg(long = "from", value_name = "PROFILE")]
        base: Option<String>,
    },
    /// Write a timestamped zip of the launcher's state files
    Backup,
}

impl Cli {
    /// Execute the CLI command. Without a command the caller starts the TUI.
    pub fn execute(self, config: &Config) -> Result<()> {
        let Some(command) = self.command else {
            return Ok(());
        };

        let paths = config.store_paths(&get_profile_config_path());
        let mut probe = SystemProbe::new(config.process_name.clone());
        let output = command.run(config, paths, &mut probe)?;
        println!("{}", output);
        Ok(())
    }
}

impl Commands {
    /// Run the command and return what should be printed.
    pub fn run<P: ProcessProbe + ?Sized>(
        self,
        config: &Config,
        paths: StorePaths,
        probe: &mut P,
    ) -> Result<String> {
        match self {
            Self::List => {
                let store = load_store(paths)?;
                let config = store.config();
                let lines: Vec<String> = config
                    .profiles
                    .iter()
                    .map(|name| {
                        if *name == config.active_profile {
                            format!("* {} (active)", name)
                        } else {
                            format!("  {}", name)
                        }
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
            Self::Switch { name } => {
                ensure_launcher_closed(probe)?;
                let mut store = load_store(paths)?;
                store
                    .switch_profile(&name)
                    .with_context(|| format!("Failed to switch to profile '{}'", name))?;
                Ok(format!("Switched to profile {}", name))
            }
            Self::Create { name, base } => {
                ensure_launcher_closed(probe)?;
                let mut store = load_store(paths)?;
                store
                    .create_profile(&name, base.as_deref())
                    .with_context(|| format!("Failed to create profile '{}'", name))?;
                Ok(format!("Created profile {}", name))
            }
            Self::Backup => {
                let archive = config
                    .backup_service()
                    .create_backup()
                    .context("Failed to create backup")?;
                Ok(format!("Created {}", format_path_for_display(&archive)))
            }
        }
    }
}

fn load_store(paths: StorePaths) -> Result<ProfileStore> {
    let config_path = paths.config_path.clone();
    ProfileStore::load(paths)
        .with_context(|| format!("Failed to load profiles from {:?}", config_path))
}

fn ensure_launcher_closed<P: ProcessProbe + ?Sized>(probe: &mut P) -> Result<()> {
    if liveness(probe) {
        bail!("EVE Launcher is running, please close it first");
    }
    Ok(())
}
