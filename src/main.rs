//! Entry point for the **tiletree** daemon.
//!
//! Runs the layout engine against the in-memory
//! [`HeadlessHost`](tiletree::headless::HeadlessHost).  Requests arrive on a
//! Unix socket, are handled on the main thread, and renders are flushed
//! once the debounce delay has passed.
//!
//! ```text
//! tiletree [--monitor WxH+X+Y]... [--socket PATH]
//! ```

use tiletree::command::MonitorInfo;
use tiletree::config::Config;
use tiletree::geometry::Rect;
use tiletree::headless::{dispatch, HeadlessHost, Request};
use tiletree::ipc::listener::UnixSocketListener;
use tiletree::tiler::Tiler;
use tiletree::traits::CommandSource;
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Default socket path for the request listener.
fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("tiletree.sock")
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/tiletree`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("tiletree")
}

/// Try to load the config from `$XDG_CONFIG_HOME/tiletree/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

struct Args {
    monitors: Vec<MonitorInfo>,
    socket: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        monitors: Vec::new(),
        socket: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--monitor" => {
                let value = it.next().ok_or("--monitor needs a WxH+X+Y value")?;
                let work_area: Rect = value.parse().map_err(|e| format!("{}", e))?;
                args.monitors.push(MonitorInfo {
                    index: args.monitors.len(),
                    work_area,
                });
            }
            "--socket" => {
                let value = it.next().ok_or("--socket needs a path")?;
                args.socket = Some(PathBuf::from(value));
            }
            other => return Err(format!("unknown argument {:?}", other)),
        }
    }
    if args.monitors.is_empty() {
        args.monitors.push(MonitorInfo {
            index: 0,
            work_area: Rect::new(0, 0, 1920, 1080),
        });
    }
    Ok(args)
}

//  Main

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    let config = load_config();

    let host = HeadlessHost::new(args.monitors);
    let mut tiler = Tiler::new(host, &config);
    if let Err(e) = tiler.sync_monitors() {
        error!("failed to query monitors: {}", e);
        std::process::exit(1);
    }

    let socket = args
        .socket
        .or_else(|| config.daemon.socket_path.clone())
        .unwrap_or_else(default_socket_path);

    let (tx, rx) = mpsc::channel::<Request>();
    spawn_listener(socket, tx);
    run_event_loop(tiler, rx);
}

//  Event loop

/// Handle requests until every sender is gone, rendering whenever the
/// debounce deadline passes.
fn run_event_loop(mut tiler: Tiler<HeadlessHost>, rx: mpsc::Receiver<Request>) {
    info!("tiletree running");
    loop {
        let wait = tiler
            .render_due_in(Instant::now())
            .unwrap_or(Duration::from_secs(3600));
        match rx.recv_timeout(wait) {
            Ok(request) => {
                if let Err(e) = dispatch(&mut tiler, request) {
                    error!("request error: {}", e);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        tiler.poll(Instant::now());
    }
    tiler.flush();
    info!("all request sources closed, exiting");
}

//  Helpers

fn spawn_listener(path: PathBuf, tx: mpsc::Sender<Request>) {
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::<Request>::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
