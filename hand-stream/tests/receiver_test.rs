//! Loopback tests for the socket receiver
//!
//! Each test binds an ephemeral port on 127.0.0.1, sends real traffic and
//! polls the store until the update lands.

use hand_stream::app::config::{Protocol, TransportConfig};
use hand_stream::hand::{HandStateStore, Side};
use hand_stream::stream::{StopToken, StreamReceiver};
use std::io::Write;
use std::net::{TcpStream, UdpSocket};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn loopback(protocol: Protocol) -> TransportConfig {
    TransportConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        poll_interval_ms: 50,
        ..TransportConfig::for_protocol(protocol)
    }
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_udp_receiver_updates_store() {
    let store = Arc::new(HandStateStore::new());
    let stop = StopToken::new();
    let mut receiver = StreamReceiver::new(loopback(Protocol::Udp), Arc::clone(&store), stop.clone());
    let addr = receiver.start().expect("bind udp");
    assert!(receiver.is_running());

    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    sender
        .send_to(b"Right Wrist,0,0,0,0,0,0,1\nRight Landmarks,1,0,0,0,1,0\n", addr)
        .unwrap();

    assert!(wait_for(|| store.world_points(Side::Right).is_some_and(|p| p.len() == 2)));
    assert!(store.age(Side::Right) < Duration::from_secs(5));

    let started = Instant::now();
    receiver.stop();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!receiver.is_running());
    assert!(stop.is_cancelled());

    let stats = receiver.stats().snapshot();
    assert_eq!(stats.chunks_received, 1);
    assert_eq!(stats.records_applied, 2);
}

#[test]
fn test_tcp_receiver_reassembles_lines() {
    let store = Arc::new(HandStateStore::new());
    let mut receiver = StreamReceiver::new(loopback(Protocol::Tcp), Arc::clone(&store), StopToken::new());
    let addr = receiver.start().expect("bind tcp");

    let mut client = TcpStream::connect(addr).unwrap();
    client.write_all(b"Left Wrist,0,0,0,").unwrap();
    client.flush().unwrap();
    thread::sleep(Duration::from_millis(20));
    client.write_all(b"0,0,0,1\nLeft Landmarks,1,2,3\n").unwrap();
    client.flush().unwrap();

    assert!(wait_for(|| store.world_points(Side::Left).is_some()));
    assert!(store.wrist_point(Side::Left).is_some());

    drop(client);
    assert!(wait_for(|| receiver.stats().connections_closed.load(Ordering::Relaxed) == 1));
    assert_eq!(receiver.stats().connections_accepted.load(Ordering::Relaxed), 1);

    receiver.stop();
    assert!(!receiver.is_running());
}

#[test]
fn test_tcp_connections_share_store() {
    let store = Arc::new(HandStateStore::new());
    let mut receiver = StreamReceiver::new(loopback(Protocol::Tcp), Arc::clone(&store), StopToken::new());
    let addr = receiver.start().expect("bind tcp");

    let mut left = TcpStream::connect(addr).unwrap();
    let mut right = TcpStream::connect(addr).unwrap();
    left.write_all(b"Left Landmarks,1,2,3\n").unwrap();
    right.write_all(b"Right Landmarks,4,5,6\n").unwrap();

    assert!(wait_for(|| {
        store.world_points(Side::Left).is_some() && store.world_points(Side::Right).is_some()
    }));

    // Open connections must not hold up shutdown for long
    let started = Instant::now();
    receiver.stop();
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_stop_before_start_is_harmless() {
    let mut receiver = StreamReceiver::new(
        loopback(Protocol::Udp),
        Arc::new(HandStateStore::new()),
        StopToken::new(),
    );
    receiver.stop();
    assert!(!receiver.is_running());
    assert!(receiver.local_addr().is_none());
}

#[test]
fn test_start_twice_fails() {
    let mut receiver = StreamReceiver::new(
        loopback(Protocol::Udp),
        Arc::new(HandStateStore::new()),
        StopToken::new(),
    );
    receiver.start().expect("bind udp");
    assert!(receiver.start().is_err());
}
