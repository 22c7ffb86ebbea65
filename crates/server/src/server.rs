// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker equity server entry point.
use anyhow::{Result, anyhow};
use log::{error, info};
use std::{future::Future, net::SocketAddr};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream, tcp::OwnedWriteHalf},
    signal,
    sync::{broadcast, mpsc},
    time::{self, Duration},
};

use showdown_equity::EngineConfig;

use crate::{
    protocol::{ErrorResponse, OddsRequest, OddsResponse},
    session::Session,
};

/// Networking and engine config.
#[derive(Debug, Clone)]
pub struct Config {
    /// The server listening address.
    pub address: String,
    /// The server listening port.
    pub port: u16,
    /// The equity engine tuning.
    pub engine: EngineConfig,
}

/// The server that handles client connections.
#[derive(Debug)]
pub struct Server {
    /// The server listener.
    listener: TcpListener,
    /// The engine config shared by all sessions.
    engine: EngineConfig,
}

/// Server entry point, runs until ctrl-c.
pub async fn run(config: Config) -> Result<()> {
    let server = Server::bind(&config).await?;
    info!("Listening on {}", server.local_addr()?);
    server.serve(signal::ctrl_c()).await
}

impl Server {
    /// Binds the server listener.
    pub async fn bind(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.address, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| anyhow!("Tcp listener bind error: {e}"))?;

        Ok(Self {
            listener,
            engine: config.engine.clone(),
        })
    }

    /// The listener local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the shutdown future completes, then waits
    /// for all connections to terminate.
    pub async fn serve<F: Future>(self, shutdown: F) -> Result<()> {
        let (shutdown_broadcast_tx, _) = broadcast::channel(1);
        let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel::<()>(1);

        tokio::select! {
            res = self.accept_loop(&shutdown_broadcast_tx, &shutdown_complete_tx) => {
                res.map_err(|e| anyhow!("Tcp listener accept error: {e}"))?;
            }
            _ = shutdown => {
                info!("Received shutdown signal...");
            }
        }

        // Notify all connections to start shutdown then wait for all
        // connections to terminate and drop their shutdown channel.
        drop(shutdown_broadcast_tx);
        drop(shutdown_complete_tx);
        let _ = shutdown_complete_rx.recv().await;

        Ok(())
    }

    /// Accepts connections and spawns a handler task for each.
    async fn accept_loop(
        &self,
        shutdown_broadcast_tx: &broadcast::Sender<()>,
        shutdown_complete_tx: &mpsc::Sender<()>,
    ) -> Result<()> {
        loop {
            let (socket, addr) = self.accept_with_retry().await?;
            info!("Accepted connection from {addr}");

            let mut handler = Handler {
                engine: self.engine.clone(),
                shutdown_broadcast_rx: shutdown_broadcast_tx.subscribe(),
                _shutdown_complete_tx: shutdown_complete_tx.clone(),
            };

            // Spawn a task to handle connection messages.
            tokio::spawn(async move {
                if let Err(err) = handler.run(socket).await {
                    error!("Connection to {addr} {err}");
                }

                info!("Connection to {addr} closed");
            });
        }
    }

    /// Accepts a connection with retries.
    async fn accept_with_retry(&self) -> Result<(TcpStream, SocketAddr)> {
        let mut retry = 0;
        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    return Ok((socket, addr));
                }
                Err(err) => {
                    if retry == 5 {
                        return Err(err.into());
                    }
                }
            }

            time::sleep(Duration::from_secs(1 << retry)).await;
            retry += 1;
        }
    }
}

/// Client connection handler.
struct Handler {
    /// The engine config for this connection session.
    engine: EngineConfig,
    /// Channel for listening shutdown notification.
    shutdown_broadcast_rx: broadcast::Receiver<()>,
    /// Sender that drops when this connection is done.
    _shutdown_complete_tx: mpsc::Sender<()>,
}

impl Handler {
    /// Handles the connection request lines and completion replies.
    async fn run(&mut self, socket: TcpStream) -> Result<()> {
        let (read_half, mut write_half) = socket.into_split();
        let mut lines = BufReader::new(read_half).lines();

        let (completions_tx, mut completions_rx) = mpsc::channel(16);
        let mut session = Session::new(self.engine.clone(), completions_tx);

        let res = loop {
            tokio::select! {
                _ = self.shutdown_broadcast_rx.recv() => {
                    break Ok(());
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }

                        // Invalid requests reply immediately, valid ones
                        // reply through a completion.
                        if let Some(reply) = handle_line(&mut session, &line) {
                            send_line(&mut write_half, &reply).await?;
                        }
                    }
                    Ok(None) => break Ok(()),
                    Err(err) => break Err(err.into()),
                },
                Some(completion) = completions_rx.recv() => {
                    if let Some(result) = session.take(completion) {
                        let reply = match result {
                            Ok(result) => serde_json::to_string(&OddsResponse::from(result))?,
                            Err(err) => serde_json::to_string(&ErrorResponse::from(&err))?,
                        };

                        send_line(&mut write_half, &reply).await?;
                    }
                }
            }
        };

        // Stop any computation left in flight.
        session.cancel_inflight();
        res
    }
}

/// Parses and validates a request line, submitting it to the session.
///
/// Returns an immediate error reply when the line does not parse or fails
/// validation, no computation starts in that case.
fn handle_line(session: &mut Session, line: &str) -> Option<String> {
    let request = match serde_json::from_str::<OddsRequest>(line) {
        Ok(request) => request,
        Err(err) => {
            let reply = ErrorResponse::invalid_request(format!("malformed request: {err}"));
            return serde_json::to_string(&reply).ok();
        }
    };

    match request.to_request().and_then(|r| r.validate().map(|_| r)) {
        Ok(request) => {
            session.submit(request);
            None
        }
        Err(err) => serde_json::to_string(&ErrorResponse::from(&err)).ok(),
    }
}

/// Sends a reply line to the client.
async fn send_line(socket: &mut OwnedWriteHalf, line: &str) -> Result<()> {
    socket.write_all(line.as_bytes()).await?;
    socket.write_all(b"\n").await?;
    Ok(())
}
