// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Loopback integration tests for the equity server.
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::oneshot,
};

use showdown_equity::EngineConfig;
use showdown_server::{
    Config,
    protocol::{ErrorResponse, OddsResponse},
    server::Server,
};

struct TestServer {
    stop_tx: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
    lines: Lines<BufReader<OwnedReadHalf>>,
    write_half: OwnedWriteHalf,
}

impl TestServer {
    /// Starts a server on an ephemeral port and connects a client to it.
    async fn start() -> Self {
        let config = Config {
            address: "127.0.0.1".to_string(),
            port: 0,
            engine: EngineConfig {
                tasks: 2,
                seed: Some(7),
                ..EngineConfig::default()
            },
        };

        let server = Server::bind(&config).await.unwrap();
        let addr = server.local_addr().unwrap();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server.serve(stop_rx));

        let socket = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = socket.into_split();

        Self {
            stop_tx,
            task,
            lines: BufReader::new(read_half).lines(),
            write_half,
        }
    }

    async fn send(&mut self, line: &str) {
        self.write_half.write_all(line.as_bytes()).await.unwrap();
        self.write_half.write_all(b"\n").await.unwrap();
    }

    async fn recv(&mut self) -> String {
        self.lines.next_line().await.unwrap().unwrap()
    }

    async fn stop(self) {
        let _ = self.stop_tx.send(());
        self.task.await.unwrap().unwrap();
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn computes_equity_over_loopback() {
    let mut server = TestServer::start().await;

    server
        .send(r#"{"heroCards":["As","Ah"],"board":[],"opponents":1}"#)
        .await;

    let reply: OddsResponse = serde_json::from_str(&server.recv().await).unwrap();
    assert_eq!(reply.hand_rank, "One Pair");
    assert!((reply.win + reply.tie + reply.loss - 1.0).abs() < 1e-6);
    assert!(reply.win > 0.8);

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn replies_structured_errors() {
    let mut server = TestServer::start().await;

    // A malformed card code.
    server
        .send(r#"{"heroCards":["Xy","Ah"],"board":[],"opponents":1}"#)
        .await;
    let reply: ErrorResponse = serde_json::from_str(&server.recv().await).unwrap();
    assert_eq!(reply.error.kind, "InvalidCardCode");

    // A duplicate card across the hero hand and the board.
    server
        .send(r#"{"heroCards":["As","Ah"],"board":["As","8d","Qs"],"opponents":1}"#)
        .await;
    let reply: ErrorResponse = serde_json::from_str(&server.recv().await).unwrap();
    assert_eq!(reply.error.kind, "DuplicateCard");

    // A board length that is not a street.
    server
        .send(r#"{"heroCards":["As","Ah"],"board":["7c","8d"],"opponents":1}"#)
        .await;
    let reply: ErrorResponse = serde_json::from_str(&server.recv().await).unwrap();
    assert_eq!(reply.error.kind, "InvalidRequest");

    // A line that is not JSON.
    server.send("drop the ace here").await;
    let reply: ErrorResponse = serde_json::from_str(&server.recv().await).unwrap();
    assert_eq!(reply.error.kind, "InvalidRequest");

    // The connection still serves valid requests after errors.
    server
        .send(r#"{"heroCards":["2c","7d"],"board":["Th","Jh","Qh","Kh","Ah"],"opponents":1}"#)
        .await;
    let reply: OddsResponse = serde_json::from_str(&server.recv().await).unwrap();
    assert_eq!(reply.hand_rank, "Straight Flush");
    assert_eq!(reply.tie, 1.0);

    server.stop().await;
}
