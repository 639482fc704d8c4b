//! Operating system integration
//!
//! [`Desktop`] is the contract actions use for volume, screenshots, windows,
//! processes and the browser. Every method defaults to
//! [`Error::Unavailable`], so an implementation only overrides what its
//! platform supports. [`CommandDesktop`] drives the usual command line
//! tools (`pactl`, `wmctrl`, `nmcli`, `ps`, `xdg-open`, ...) and reports a
//! missing tool as unavailable rather than failing.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Error, Result};

/// Snapshot of system load
#[derive(Debug, Clone, PartialEq)]
pub struct SystemInfo {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub disk_percent: Option<f32>,
    pub battery_percent: Option<u8>,
}

fn unsupported(what: &str) -> Error {
    Error::Unavailable(format!("{what} is not supported on this system"))
}

/// OS collaborator used by desktop actions
#[async_trait]
pub trait Desktop: Send + Sync {
    /// Current output volume, 0 to 100
    async fn volume(&self) -> Result<u8> {
        Err(unsupported("volume control"))
    }

    /// Set output volume, 0 to 100
    async fn set_volume(&self, _level: u8) -> Result<()> {
        Err(unsupported("volume control"))
    }

    /// Set or toggle (`None`) mute; returns whether output is now muted
    async fn set_mute(&self, _muted: Option<bool>) -> Result<bool> {
        Err(unsupported("volume control"))
    }

    /// Capture the screen into `dir`, returning the image path
    async fn screenshot(&self, _dir: &Path) -> Result<PathBuf> {
        Err(unsupported("screenshots"))
    }

    /// Lock the session
    async fn lock_screen(&self) -> Result<()> {
        Err(unsupported("screen locking"))
    }

    /// CPU, memory, disk and battery usage
    async fn system_info(&self) -> Result<SystemInfo> {
        Err(unsupported("system information"))
    }

    /// Saved wireless network profiles
    async fn wifi_profiles(&self) -> Result<Vec<String>> {
        Err(unsupported("wifi profiles"))
    }

    /// Minimize every window
    async fn minimize_windows(&self) -> Result<()> {
        Err(unsupported("window management"))
    }

    /// Focus the first window whose title contains `name`
    async fn switch_window(&self, _name: &str) -> Result<bool> {
        Err(unsupported("window management"))
    }

    /// Terminate the first process whose name contains `name`
    async fn close_app(&self, _name: &str) -> Result<bool> {
        Err(unsupported("closing applications"))
    }

    /// Open a URL in the default browser
    async fn open_url(&self, _url: &str) -> Result<()> {
        Err(unsupported("opening a browser"))
    }

    /// Launch an application command line
    async fn launch(&self, _command: &str) -> Result<()> {
        Err(unsupported("launching applications"))
    }

    /// Names of processes using more than `threshold` percent CPU
    async fn busy_processes(&self, _threshold: f32) -> Result<Vec<String>> {
        Err(unsupported("process inspection"))
    }
}

/// Desktop that supports nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDesktop;

impl Desktop for NoDesktop {}

/// Desktop backed by platform command line tools
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandDesktop;

const DEFAULT_SINK: &str = "@DEFAULT_SINK@";

/// Screenshot tools in preference order, with the output path as last argument
const SCREENSHOT_TOOLS: &[(&str, &[&str])] = &[
    ("screencapture", &["-x"]),
    ("gnome-screenshot", &["-f"]),
    ("grim", &[]),
    ("scrot", &[]),
    ("spectacle", &["-b", "-n", "-o"]),
];

#[async_trait]
impl Desktop for CommandDesktop {
    async fn volume(&self) -> Result<u8> {
        if cfg!(target_os = "macos") {
            let out = run("osascript", &["-e", "output volume of (get volume settings)"]).await?;
            return out
                .trim()
                .parse()
                .map_err(|_| Error::Collaborator(format!("unexpected volume output: {out}")));
        }

        let out = run("pactl", &["get-sink-volume", DEFAULT_SINK]).await?;
        parse_pactl_volume(&out)
            .ok_or_else(|| Error::Collaborator(format!("unexpected pactl output: {out}")))
    }

    async fn set_volume(&self, level: u8) -> Result<()> {
        let level = level.min(100);
        if cfg!(target_os = "macos") {
            let script = format!("set volume output volume {level}");
            run("osascript", &["-e", &script]).await?;
        } else {
            let percent = format!("{level}%");
            run("pactl", &["set-sink-volume", DEFAULT_SINK, &percent]).await?;
        }
        tracing::info!(level, "volume set");
        Ok(())
    }

    async fn set_mute(&self, muted: Option<bool>) -> Result<bool> {
        if cfg!(target_os = "macos") {
            let target = match muted {
                Some(m) => m,
                None => {
                    let out =
                        run("osascript", &["-e", "output muted of (get volume settings)"]).await?;
                    out.trim() != "true"
                }
            };
            let script = format!("set volume output muted {target}");
            run("osascript", &["-e", &script]).await?;
            return Ok(target);
        }

        let arg = match muted {
            Some(true) => "1",
            Some(false) => "0",
            None => "toggle",
        };
        run("pactl", &["set-sink-mute", DEFAULT_SINK, arg]).await?;
        let out = run("pactl", &["get-sink-mute", DEFAULT_SINK]).await?;
        Ok(parse_pactl_mute(&out))
    }

    async fn screenshot(&self, dir: &Path) -> Result<PathBuf> {
        let (tool, args) = SCREENSHOT_TOOLS
            .iter()
            .find(|(tool, _)| which::which(tool).is_ok())
            .ok_or_else(|| Error::Unavailable("no screenshot tool found".to_string()))?;

        let filename = format!(
            "screenshot_{}.png",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = dir.join(filename);
        let path_arg = path.to_string_lossy().into_owned();

        let mut all_args: Vec<&str> = args.to_vec();
        all_args.push(&path_arg);
        run(tool, &all_args).await?;

        tracing::info!(path = %path.display(), tool, "screenshot saved");
        Ok(path)
    }

    async fn lock_screen(&self) -> Result<()> {
        if cfg!(target_os = "macos") {
            run("pmset", &["displaysleepnow"]).await?;
            return Ok(());
        }
        if cfg!(windows) {
            run("rundll32.exe", &["user32.dll,LockWorkStation"]).await?;
            return Ok(());
        }

        match run("loginctl", &["lock-session"]).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::debug!(error = %e, "loginctl lock failed, trying xdg-screensaver");
                run("xdg-screensaver", &["lock"]).await.map(|_| ())
            }
        }
    }

    async fn system_info(&self) -> Result<SystemInfo> {
        if !cfg!(target_os = "linux") {
            return Err(unsupported("system information"));
        }

        let before = parse_cpu_times(&tokio::fs::read_to_string("/proc/stat").await?);
        tokio::time::sleep(Duration::from_millis(500)).await;
        let after = parse_cpu_times(&tokio::fs::read_to_string("/proc/stat").await?);
        let cpu_percent = match (before, after) {
            (Some(b), Some(a)) => cpu_usage(b, a),
            _ => return Err(Error::Collaborator("unreadable /proc/stat".to_string())),
        };

        let meminfo = tokio::fs::read_to_string("/proc/meminfo").await?;
        let memory_percent = parse_meminfo_percent(&meminfo)
            .ok_or_else(|| Error::Collaborator("unreadable /proc/meminfo".to_string()))?;

        let disk_percent = match run("df", &["-P", "/"]).await {
            Ok(out) => parse_df_percent(&out),
            Err(e) => {
                tracing::debug!(error = %e, "disk usage unavailable");
                None
            }
        };

        Ok(SystemInfo {
            cpu_percent,
            memory_percent,
            disk_percent,
            battery_percent: read_battery().await,
        })
    }

    async fn wifi_profiles(&self) -> Result<Vec<String>> {
        if cfg!(windows) {
            let out = run("netsh", &["wlan", "show", "profile"]).await?;
            return Ok(parse_netsh_profiles(&out));
        }
        let out = run("nmcli", &["-t", "-f", "NAME,TYPE", "connection", "show"]).await?;
        Ok(parse_nmcli_wifi(&out))
    }

    async fn minimize_windows(&self) -> Result<()> {
        run("wmctrl", &["-k", "on"]).await.map(|_| ())
    }

    async fn switch_window(&self, name: &str) -> Result<bool> {
        let out = run("wmctrl", &["-l"]).await?;
        let needle = name.to_lowercase();
        let Some((id, title)) = parse_wmctrl(&out)
            .into_iter()
            .find(|(_, title)| title.to_lowercase().contains(&needle))
        else {
            return Ok(false);
        };

        run("wmctrl", &["-i", "-a", &id]).await?;
        tracing::info!(window = %title, "switched window");
        Ok(true)
    }

    async fn close_app(&self, name: &str) -> Result<bool> {
        let out = run("ps", &["-Ao", "pid=,comm="]).await?;
        let own_pid = std::process::id();
        let needle = name.to_lowercase();

        let Some((pid, comm)) = parse_ps_processes(&out)
            .into_iter()
            .find(|(pid, comm)| *pid != own_pid && comm.to_lowercase().contains(&needle))
        else {
            return Ok(false);
        };

        run("kill", &[&pid.to_string()]).await?;
        tracing::info!(pid, process = %comm, "terminated process");
        Ok(true)
    }

    async fn open_url(&self, url: &str) -> Result<()> {
        if cfg!(target_os = "macos") {
            spawn_detached("open", &[url])
        } else if cfg!(windows) {
            spawn_detached("cmd", &["/C", "start", "", url])
        } else {
            spawn_detached("xdg-open", &[url])
        }
    }

    async fn launch(&self, command: &str) -> Result<()> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::InvalidInput("empty command".to_string()))?;
        let args: Vec<&str> = parts.collect();

        if which::which(program).is_err() {
            return Err(Error::NotFound(program.to_string()));
        }
        spawn_detached(program, &args)
    }

    async fn busy_processes(&self, threshold: f32) -> Result<Vec<String>> {
        let out = run("ps", &["-Ao", "pcpu=,comm="]).await?;
        Ok(parse_ps_busy(&out, threshold))
    }
}

/// Run a tool to completion and return its stdout
async fn run(program: &str, args: &[&str]) -> Result<String> {
    let path = which::which(program)
        .map_err(|_| Error::Unavailable(format!("{program} not found")))?;

    let output = Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Collaborator(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Start a program without waiting for it
fn spawn_detached(program: &str, args: &[&str]) -> Result<()> {
    let path = which::which(program)
        .map_err(|_| Error::Unavailable(format!("{program} not found")))?;

    Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    tracing::debug!(program, "launched");
    Ok(())
}

async fn read_battery() -> Option<u8> {
    let mut entries = tokio::fs::read_dir("/sys/class/power_supply").await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        if !entry.file_name().to_string_lossy().starts_with("BAT") {
            continue;
        }
        let capacity = tokio::fs::read_to_string(entry.path().join("capacity"))
            .await
            .ok()?;
        return capacity.trim().parse().ok();
    }
    None
}

/// Percentage from `pactl get-sink-volume` output
fn parse_pactl_volume(output: &str) -> Option<u8> {
    output
        .split('/')
        .map(str::trim)
        .find_map(|part| part.strip_suffix('%'))
        .and_then(|n| n.trim().parse().ok())
}

fn parse_pactl_mute(output: &str) -> bool {
    output.trim().eq_ignore_ascii_case("mute: yes")
}

/// `(idle, total)` jiffies from the aggregate line of `/proc/stat`
fn parse_cpu_times(stat: &str) -> Option<(u64, u64)> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|v| v.parse().ok())
        .collect();
    // idle + iowait
    let idle = values.get(3)? + values.get(4).copied().unwrap_or(0);
    Some((idle, values.iter().sum()))
}

#[allow(clippy::cast_precision_loss)]
fn cpu_usage(before: (u64, u64), after: (u64, u64)) -> f32 {
    let total = after.1.saturating_sub(before.1);
    if total == 0 {
        return 0.0;
    }
    let idle = after.0.saturating_sub(before.0);
    (total.saturating_sub(idle) as f32 / total as f32) * 100.0
}

#[allow(clippy::cast_precision_loss)]
fn parse_meminfo_percent(meminfo: &str) -> Option<f32> {
    let field = |name: &str| -> Option<u64> {
        meminfo
            .lines()
            .find(|l| l.starts_with(name))?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    };
    let total = field("MemTotal:")?;
    let available = field("MemAvailable:")?;
    if total == 0 {
        return None;
    }
    Some((total.saturating_sub(available) as f32 / total as f32) * 100.0)
}

/// Use% column of `df -P`
fn parse_df_percent(output: &str) -> Option<f32> {
    output
        .lines()
        .nth(1)?
        .split_whitespace()
        .nth(4)?
        .strip_suffix('%')?
        .parse()
        .ok()
}

fn parse_nmcli_wifi(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.rsplit_once(':'))
        .filter(|(_, kind)| kind.contains("wireless"))
        .map(|(name, _)| name.replace("\\:", ":"))
        .collect()
}

fn parse_netsh_profiles(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.contains("All User Profile"))
        .filter_map(|line| line.rsplit_once(':'))
        .map(|(_, name)| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// `(window id, title)` pairs from `wmctrl -l`
fn parse_wmctrl(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| {
            // id, desktop, host, then the title with its spaces intact
            let mut rest = line.trim_start();
            let mut fields = Vec::with_capacity(3);
            for _ in 0..3 {
                let (field, tail) = rest.split_once(char::is_whitespace)?;
                fields.push(field);
                rest = tail.trim_start();
            }
            Some((fields[0].to_string(), rest.trim().to_string()))
        })
        .collect()
}

/// `(pid, command)` pairs from `ps -Ao pid=,comm=`
fn parse_ps_processes(output: &str) -> Vec<(u32, String)> {
    output
        .lines()
        .filter_map(|line| {
            let (pid, comm) = line.trim().split_once(char::is_whitespace)?;
            Some((pid.parse().ok()?, comm.trim().to_string()))
        })
        .collect()
}

/// Commands above `threshold` from `ps -Ao pcpu=,comm=`
fn parse_ps_busy(output: &str, threshold: f32) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let (cpu, comm) = line.trim().split_once(char::is_whitespace)?;
            let cpu: f32 = cpu.parse().ok()?;
            (cpu > threshold).then(|| comm.trim().to_string())
        })
        .collect()
}
