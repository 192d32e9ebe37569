//! Side effects run after the theme files are written. Failures only warn.

use std::process::Command;

use tracing::{info, warn};

use wallhue::cli::Hook;

fn command(hook: Hook) -> Command {
    match hook {
        Hook::Waybar => {
            let mut cmd = Command::new("pkill");
            cmd.args(["-SIGUSR2", "waybar"]);
            cmd
        }
        Hook::Hyprland => {
            let mut cmd = Command::new("hyprctl");
            cmd.arg("reload");
            cmd
        }
    }
}

fn run_command(label: &str, mut cmd: Command) {
    match cmd.status() {
        Ok(status) if status.success() => info!("{label} succeeded"),
        Ok(status) => warn!(%status, "{label} failed"),
        Err(error) => warn!(%error, "{label} could not be started"),
    }
}

pub fn reload(hook: Hook) {
    run_command(&format!("reload {hook:?}"), command(hook));
}

pub fn notify(message: &str) {
    let mut cmd = Command::new("notify-send");
    cmd.args(["wallhue", message]);
    run_command("notification", cmd);
}
