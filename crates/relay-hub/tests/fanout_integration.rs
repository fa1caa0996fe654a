//! Integration tests for hub fan-out over real WebSocket connections.
//!
//! Each test binds an ephemeral listener, runs [`relay_hub::infrastructure::serve`]
//! in a background task, and attaches real `tokio-tungstenite` clients. This
//! exercises the full network path: handshake, registration, verbatim
//! fan-out (including back to the sender), and peer removal on disconnect.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use relay_hub::infrastructure::serve;

type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts a hub on an ephemeral port; returns its URL and the shutdown flag.
async fn start_hub() -> (String, Arc<AtomicBool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    tokio::spawn(async move {
        serve(listener, flag).await;
    });
    (format!("ws://{addr}"), running)
}

async fn connect(url: &str) -> WsClient {
    let (ws, _response) = connect_async(url).await.expect("hub must accept the peer");
    ws
}

/// Reads frames until a text frame arrives, with a timeout.
async fn recv_text(ws: &mut WsClient) -> String {
    timeout(RECV_TIMEOUT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return text,
                Some(Ok(_)) => continue,
                other => panic!("connection ended while waiting for a frame: {other:?}"),
            }
        }
    })
    .await
    .expect("timed out waiting for a frame")
}

#[tokio::test]
async fn test_frame_is_fanned_out_to_all_peers_including_sender() {
    let (url, running) = start_hub().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;

    a.send(Message::Text("hot-right_hand".to_string()))
        .await
        .unwrap();

    assert_eq!(recv_text(&mut b).await, "hot-right_hand");
    // No self-exclusion: the sender sees its own frame too.
    assert_eq!(recv_text(&mut a).await, "hot-right_hand");

    running.store(false, Ordering::Relaxed);
}

#[tokio::test]
async fn test_frames_from_one_producer_arrive_in_order() {
    let (url, running) = start_hub().await;
    let mut producer = connect(&url).await;
    let mut consumer = connect(&url).await;

    producer
        .send(Message::Text("impact-chest".to_string()))
        .await
        .unwrap();
    producer
        .send(Message::Text("hot-left_hand".to_string()))
        .await
        .unwrap();

    assert_eq!(recv_text(&mut consumer).await, "impact-chest");
    assert_eq!(recv_text(&mut consumer).await, "hot-left_hand");

    running.store(false, Ordering::Relaxed);
}

#[tokio::test]
async fn test_disconnected_peer_does_not_prevent_delivery_to_the_rest() {
    let (url, running) = start_hub().await;
    let mut a = connect(&url).await;
    let b = connect(&url).await;
    let mut c = connect(&url).await;

    // B leaves; the hub removes it when the close is observed.
    drop(b);
    tokio::time::sleep(Duration::from_millis(200)).await;

    a.send(Message::Text("ping".to_string())).await.unwrap();

    // The forwarding pass survives B's absence and reaches C and A.
    assert_eq!(recv_text(&mut c).await, "ping");
    assert_eq!(recv_text(&mut a).await, "ping");

    running.store(false, Ordering::Relaxed);
}

#[tokio::test]
async fn test_arbitrary_frames_are_forwarded_verbatim() {
    // The hub does not interpret frames; unrecognized event types still fan
    // out so future consumers can act on them.
    let (url, running) = start_hub().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;

    a.send(Message::Text("some-future-event-type".to_string()))
        .await
        .unwrap();

    assert_eq!(recv_text(&mut b).await, "some-future-event-type");

    running.store(false, Ordering::Relaxed);
}
