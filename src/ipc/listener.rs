//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as one JSON-encoded message, by default a
//! [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"Focus":"left"}
//! {"Split":"vertical"}
//! {"SetLayout":"tabbed"}
//! {"DragBegin":{"force_container":true}}
//! "DragEnd"
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded messages of type `M`.
///
/// Each accepted connection can send multiple newline-delimited messages.
/// When the connection closes, the listener waits for the next one.
pub struct UnixSocketListener<M = Command> {
    path: PathBuf,
    _message: PhantomData<fn() -> M>,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<M> UnixSocketListener<M> {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    /// A stale file at `path` is removed first.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _message: PhantomData,
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse one socket line.  Blank lines yield `Ok(None)`.
pub fn parse_line<M: DeserializeOwned>(line: &str) -> Result<Option<M>, UnixSocketError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

impl<M> CommandSource for UnixSocketListener<M>
where
    M: DeserializeOwned + Debug + Send + 'static,
{
    type Message = M;
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the receiving side of `sink` is
    /// dropped.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<M>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    let reader = BufReader::new(stream);
                    for line in reader.lines() {
                        match line {
                            Ok(text) => match parse_line::<M>(&text) {
                                Ok(None) => continue,
                                Ok(Some(msg)) => {
                                    debug!("received {:?}", msg);
                                    if sink.send(msg).is_err() {
                                        info!("sink closed, shutting down");
                                        let _ = std::fs::remove_file(&self.path);
                                        return Ok(());
                                    }
                                }
                                Err(e) => {
                                    error!("bad message: {}: {}", text, e);
                                }
                            },
                            Err(e) => {
                                error!("read error: {}", e);
                                break;
                            }
                        }
                    }
                    debug!("client disconnected");
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

//  Tests
