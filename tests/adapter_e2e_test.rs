use std::time::Duration;

use serde_json::Value;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;

use brickfall::adapter::{serve, GameRuntime, RuntimeConfig};

struct Client {
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    writer: WriteHalf<DuplexStream>,
    server: JoinHandle<anyhow::Result<()>>,
}

impl Client {
    fn connect(config: RuntimeConfig) -> Self {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_io);
        let server = tokio::spawn(async move {
            serve(
                GameRuntime::spawn(config),
                BufReader::new(server_read),
                server_write,
            )
            .await
        });

        let (client_read, writer) = tokio::io::split(client_io);
        Self {
            lines: BufReader::new(client_read).lines(),
            writer,
            server,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for a server line")
            .unwrap()
            .expect("server closed the stream");
        serde_json::from_str(&line).unwrap()
    }

    async fn quit(mut self) {
        self.send(r#"{"type":"quit"}"#).await;
        tokio::time::timeout(Duration::from_secs(2), self.server)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }
}

fn manual_clock(versus: bool) -> RuntimeConfig {
    RuntimeConfig {
        tick_ms: 0,
        versus,
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn adapter_action_update_and_snapshot() {
    let mut client = Client::connect(manual_clock(false));

    client.send(r#"{"type":"snapshot"}"#).await;
    let before = client.recv().await;
    assert_eq!(before["type"], "snapshot");
    assert!(before.get("side").is_none());
    let spawn_x = before["piece"]["x"].as_i64().unwrap();
    assert_eq!(before["piece"]["y"], 0);
    assert_eq!(before["canHold"], true);

    client
        .send(r#"{"type":"action","action":"moveLeft"}"#)
        .await;
    let update = client.recv().await;
    assert_eq!(update["type"], "update");
    assert_eq!(update["changed"], true);
    assert_eq!(update["gameOver"], false);
    assert_eq!(update["piece"]["x"].as_i64().unwrap(), spawn_x - 1);

    // One full gravity interval at medium difficulty
    client.send(r#"{"type":"advance","ms":400}"#).await;
    let update = client.recv().await;
    assert_eq!(update["piece"]["y"], 1);

    client
        .send(r#"{"type":"action","action":"hardDrop"}"#)
        .await;
    let update = client.recv().await;
    let events: Vec<&str> = update["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["event"].as_str().unwrap())
        .collect();
    assert_eq!(events, vec!["pieceLocked", "pieceSpawned"]);
    assert!(update.get("cleared").is_none());

    client.send(r#"{"type":"snapshot"}"#).await;
    let after = client.recv().await;
    let filled = after["grid"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .filter(|cell| cell.as_u64() != Some(0))
        .count();
    assert_eq!(filled, 4);

    client.quit().await;
}

#[tokio::test]
async fn adapter_rejects_bad_lines_and_keeps_serving() {
    let mut client = Client::connect(manual_clock(false));

    client.send("{not json").await;
    assert_eq!(client.recv().await["code"], "malformed");

    client
        .send(r#"{"type":"action","action":"spin"}"#)
        .await;
    let error = client.recv().await;
    assert_eq!(error["type"], "error");
    assert_eq!(error["code"], "unknown_action");
    assert!(error["message"].as_str().unwrap().contains("spin"));

    client.send(r#"{"type":"teleport"}"#).await;
    assert_eq!(client.recv().await["code"], "unknown_type");

    // Still alive afterwards
    client.send(r#"{"type":"action","action":"pause"}"#).await;
    let update = client.recv().await;
    assert_eq!(update["events"][0]["event"], "paused");

    client.send(r#"{"type":"advance","ms":5000}"#).await;
    client.send(r#"{"type":"snapshot"}"#).await;
    let snapshot = client.recv().await;
    assert_eq!(snapshot["type"], "snapshot");
    assert_eq!(snapshot["paused"], true);
    assert_eq!(snapshot["piece"]["y"], 0);

    client.quit().await;
}

#[tokio::test]
async fn adapter_versus_routes_by_side() {
    let mut client = Client::connect(manual_clock(true));

    client
        .send(r#"{"type":"action","action":"hardDrop","side":"right"}"#)
        .await;
    let update = client.recv().await;
    assert_eq!(update["side"], "right");

    client
        .send(r#"{"type":"action","action":"moveLeft","side":"middle"}"#)
        .await;
    assert_eq!(client.recv().await["code"], "unknown_side");

    client.send(r#"{"type":"snapshot"}"#).await;
    let left = client.recv().await;
    let right = client.recv().await;
    assert_eq!(left["side"], "left");
    assert_eq!(right["side"], "right");
    let occupied = |snapshot: &Value| {
        snapshot["grid"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|row| row.as_array().unwrap())
            .any(|cell| cell.as_u64() != Some(0))
    };
    assert!(!occupied(&left));
    assert!(occupied(&right));

    // Session actions reach both boards
    client.send(r#"{"type":"action","action":"pause"}"#).await;
    let first = client.recv().await;
    let second = client.recv().await;
    assert_eq!(first["side"], "left");
    assert_eq!(second["side"], "right");

    client.quit().await;
}

#[tokio::test]
async fn adapter_stops_when_client_hangs_up() {
    let client = Client::connect(manual_clock(false));
    let Client {
        mut writer, server, ..
    } = client;
    writer.shutdown().await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), server)
        .await
        .expect("server did not notice end of input")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn adapter_pipelined_commands_keep_their_order() {
    let mut client = Client::connect(manual_clock(false));
    client
        .send(concat!(
            r#"{"type":"action","action":"hardDrop"}"#,
            "\n",
            r#"{"type":"snapshot"}"#,
            "\n",
            r#"{"type":"action","action":"hardDrop"}"#,
            "\n",
            r#"{"type":"quit"}"#,
        ))
        .await;

    let mut order = Vec::new();
    while let Some(line) = tokio::time::timeout(Duration::from_secs(2), client.lines.next_line())
        .await
        .expect("timed out waiting for a server line")
        .unwrap()
    {
        let value: Value = serde_json::from_str(&line).unwrap();
        order.push(value["type"].as_str().unwrap().to_string());
    }
    assert_eq!(order, vec!["update", "snapshot", "update"]);

    tokio::time::timeout(Duration::from_secs(2), client.server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
