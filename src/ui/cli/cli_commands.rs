use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DashboardConfig;
use crate::connections::device::ConnectTarget;
use crate::storage::{Profile, ProfileStore};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "meshdash", version, about = "Mesh radio dashboard", subcommand_required = true)]
pub struct Args {
    /// Config file (default: config.json in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Which radio to talk to.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    /// Serial port to open; without any target option the first port found is used
    #[arg(long, conflicts_with_all = ["host", "profile"])]
    pub port: Option<String>,
    /// IP address or hostname of a network-attached radio
    #[arg(long, conflicts_with = "profile")]
    pub host: Option<String>,
    /// TCP port of the radio (default from config, normally 4403)
    #[arg(long, requires = "host")]
    pub tcp_port: Option<u16>,
    /// Name of a saved connection profile
    #[arg(long)]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List serial ports
    Ports,
    /// Connect and hold the connection until Ctrl+C
    Connect {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Show the node table (needs a protocol-aware device backend)
    Nodes {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Show information about the attached node (needs a protocol-aware device backend)
    Info {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Send a direct message (needs a protocol-aware device backend)
    Send {
        #[command(flatten)]
        target: TargetArgs,
        /// Destination node number
        #[arg(long)]
        to: u32,
        message: String,
    },
    /// Broadcast on the primary channel (needs a protocol-aware device backend)
    Broadcast {
        #[command(flatten)]
        target: TargetArgs,
        message: String,
    },
    /// Set the owner names of the attached node (needs a protocol-aware device backend)
    SetOwner {
        #[command(flatten)]
        target: TargetArgs,
        /// Long name (max 36 bytes)
        #[arg(long)]
        long_name: String,
        /// Short name (max 4 bytes)
        #[arg(long)]
        short_name: String,
    },
    /// Manage saved connection profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// List saved profiles
    List,
    /// Save the given target under a name
    Save {
        name: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Delete a saved profile
    Delete { name: String },
}

impl TargetArgs {
    /// Resolve the options into a connect target.
    pub fn resolve(
        &self,
        config: &DashboardConfig,
        store: Option<&ProfileStore>,
    ) -> anyhow::Result<ConnectTarget> {
        if let Some(name) = &self.profile {
            let store = store.context("profile storage is unavailable")?;
            return store
                .load(name)
                .with_context(|| format!("reading profile '{}'", name))?
                .map(|profile| profile.target())
                .with_context(|| format!("no profile named '{}'", name));
        }
        if let Some(host) = &self.host {
            return Ok(ConnectTarget::Network {
                host: host.clone(),
                port: self.tcp_port.unwrap_or(config.default_network_port),
            });
        }
        Ok(ConnectTarget::Serial {
            path: self.port.clone(),
        })
    }

    /// Build a profile for `name` from the options.
    pub fn to_profile(&self, name: &str, config: &DashboardConfig) -> anyhow::Result<Profile> {
        if self.profile.is_some() {
            bail!("a profile cannot be saved from another profile");
        }
        Ok(match self.resolve(config, None)? {
            ConnectTarget::Serial { path } => Profile::Serial {
                name: name.to_owned(),
                port: path,
            },
            ConnectTarget::Network { host, port } => Profile::Network {
                name: name.to_owned(),
                host,
                port,
            },
        })
    }
}
