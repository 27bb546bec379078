use anyhow::Context;
use log::{info, warn};
use std::thread;

use super::cli_commands::{Args, Command, ProfileAction, TargetArgs};
use crate::config::DashboardConfig;
use crate::connections::device::{ConnectionKind, Destination};
use crate::core::context::AppContext;
use crate::core::observers::ConnectionEvent;
use crate::core::shutdown::install_interrupt_handler;
use crate::mesh::{self, format::render_section};
use crate::storage::ProfileStore;
use crate::utils::logging::init_logging;

pub fn run_cli(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    init_logging(config.log_filter()?);

    let profiles = match ProfileStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Profiles unavailable: {}", e);
            None
        }
    };

    let ctx = AppContext::new(config);
    ctx.manager().register_observer(|event: &ConnectionEvent| {
        eprintln!("{}", status_line(event));
        Ok(())
    });
    // Disconnects on every return path below.
    let _shutdown = ctx.shutdown_guard();

    match args.command {
        Command::Ports => {
            let ports = ctx.manager().scan_serial_ports()?;
            if ports.is_empty() {
                println!("No serial ports found.");
            }
            for p in ports {
                println!("{} - {} [{}]", p.device_path, p.description, p.hardware_id);
            }
        }
        Command::Connect { target } => {
            connect(&ctx, &target, profiles.as_ref())?;
            install_interrupt_handler(ctx.manager().clone())
                .context("installing Ctrl+C handler")?;
            info!("Holding connection. Press Ctrl+C to disconnect and exit.");
            // The interrupt handler disconnects and exits the process.
            loop {
                thread::park();
            }
        }
        Command::Nodes { target } => {
            connect(&ctx, &target, profiles.as_ref())?;
            let nodes = mesh::list_nodes(ctx.manager())?;
            println!("Total nodes: {}", nodes.len());
            for n in nodes {
                println!(
                    "Node {} | Long: {} | Short: {} | MAC: {}",
                    n.num, n.long_name, n.short_name, n.mac
                );
            }
        }
        Command::Info { target } => {
            connect(&ctx, &target, profiles.as_ref())?;
            let node = mesh::node_info(ctx.manager())?;
            println!(
                "Node Number: {}",
                node.num.map_or_else(|| "N/A".to_owned(), |n| n.to_string())
            );
            println!(
                "Is Favorite: {}",
                match node.is_favorite {
                    Some(true) => "Yes",
                    Some(false) => "No",
                    None => "N/A",
                }
            );
            for (title, section) in [
                ("User", &node.user),
                ("Position", &node.position),
                ("Device Metrics", &node.metrics),
            ] {
                println!();
                for line in render_section(title, section) {
                    println!("{}", line);
                }
            }
        }
        Command::Send {
            target,
            to,
            message,
        } => {
            connect(&ctx, &target, profiles.as_ref())?;
            println!("{}", mesh::send_message(ctx.manager(), &message, Destination::Node(to))?);
        }
        Command::Broadcast { target, message } => {
            connect(&ctx, &target, profiles.as_ref())?;
            println!("{}", mesh::send_to_channel(ctx.manager(), &message)?);
        }
        Command::SetOwner {
            target,
            long_name,
            short_name,
        } => {
            connect(&ctx, &target, profiles.as_ref())?;
            println!("{}", mesh::set_owner(ctx.manager(), &long_name, &short_name)?);
        }
        Command::Profile { action } => {
            let store = profiles.context("profile storage is unavailable")?;
            run_profile_action(action, &store, ctx.config())?;
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => match DashboardConfig::default_path() {
            Ok(path) => path,
            // No home directory: run on defaults.
            Err(_) => return Ok(DashboardConfig::default()),
        },
    };
    Ok(DashboardConfig::load_or_default(&path)?)
}

fn connect(
    ctx: &AppContext,
    target: &TargetArgs,
    profiles: Option<&ProfileStore>,
) -> anyhow::Result<()> {
    let target = target.resolve(ctx.config(), profiles)?;
    ctx.manager().connect(target)?;
    Ok(())
}

fn run_profile_action(
    action: ProfileAction,
    store: &ProfileStore,
    config: &DashboardConfig,
) -> anyhow::Result<()> {
    match action {
        ProfileAction::List => {
            for profile in store.list()? {
                println!("{:<16} {}", profile.name(), profile.target());
            }
        }
        ProfileAction::Save { name, target } => {
            let profile = target.to_profile(&name, config)?;
            store.save(&profile)?;
            println!("Saved profile '{}' ({})", name, profile.target());
        }
        ProfileAction::Delete { name } => {
            if store.delete(&name)? {
                println!("Deleted profile '{}'", name);
            } else {
                println!("No profile named '{}'", name);
            }
        }
    }
    Ok(())
}

/// One-line status message for a connection transition.
pub fn status_line(event: &ConnectionEvent) -> String {
    match event {
        ConnectionEvent::Connected(status) => {
            let kind = match status.kind {
                ConnectionKind::Network => "Network",
                _ => "Serial",
            };
            match &status.address {
                Some(address) => format!("Connected to: {} ({})", address, kind),
                None => format!("Connected (unknown) ({})", kind),
            }
        }
        ConnectionEvent::ConnectFailed { reason, .. } => format!("Connection failed: {}", reason),
        ConnectionEvent::Disconnected { previous: Some(address) } => {
            format!("Disconnected from {}", address)
        }
        ConnectionEvent::Disconnected { previous: None } => "Disconnected".to_owned(),
    }
}
