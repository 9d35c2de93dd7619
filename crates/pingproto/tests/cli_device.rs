#![cfg(feature = "cli")]

use std::net::{SocketAddr, UdpSocket};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use pingproto::frame::Frame;
use pingproto::messages::common::{GeneralRequest, ProtocolVersion};
use pingproto::messages::{ping1d, Message, Ping1dMessage, Version};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pingproto"))
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> Output {
    let start = Instant::now();
    loop {
        match child.try_wait().expect("child wait should not error") {
            Some(_) => {
                return child
                    .wait_with_output()
                    .expect("output should be collectable")
            }
            None if start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                panic!("CLI did not exit within {timeout:?}");
            }
            None => thread::sleep(Duration::from_millis(25)),
        }
    }
}

/// Minimal scripted device: answers version requests, then serves one
/// voltage telemetry request and exits.
fn spawn_fake_device() -> (SocketAddr, thread::JoinHandle<()>) {
    let socket = UdpSocket::bind(("127.0.0.1", 0)).expect("device socket should bind");
    let addr = socket.local_addr().expect("device socket should have an address");
    socket
        .set_read_timeout(Some(Duration::from_secs(10)))
        .expect("read timeout should apply");

    let handle = thread::spawn(move || {
        let mut buf = [0u8; 2048];
        loop {
            let (n, peer) = match socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(_) => return,
            };
            let frame = match Frame::from_buffer(BytesMut::from(&buf[..n])) {
                Ok(frame) => frame,
                Err(_) => continue,
            };
            if frame.message_id() != GeneralRequest::ID {
                continue;
            }
            let request =
                GeneralRequest::decode(frame.payload()).expect("request payload should decode");

            match request.requested_id {
                ProtocolVersion::ID => {
                    let reply = Message::ProtocolVersion(ProtocolVersion::new(Version {
                        major: 1,
                        minor: 0,
                        patch: 0,
                        reserved: 0,
                    }))
                    .to_frame_bytes()
                    .expect("version frame should encode");
                    socket
                        .send_to(&reply, peer)
                        .expect("version reply should send");
                }
                ping1d::Voltage5::ID => {
                    let reply = Message::Ping1d(Ping1dMessage::Voltage5(ping1d::Voltage5 {
                        voltage: 4985,
                    }))
                    .to_frame_bytes()
                    .expect("voltage frame should encode");
                    socket
                        .send_to(&reply, peer)
                        .expect("voltage reply should send");
                    return;
                }
                _ => {}
            }
        }
    });

    (addr, handle)
}

#[test]
fn catalog_lists_every_family() {
    let child = bin()
        .args(["catalog", "--format", "json"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("catalog should spawn");
    let output = wait_with_timeout(child, Duration::from_secs(10));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"protocol_version\""));
    assert!(stdout.contains("\"ping1d.profile\""));
    assert!(stdout.contains("\"ping360.transducer\""));
}

#[test]
fn version_prints_semver() {
    let child = bin()
        .arg("version")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("version should spawn");
    let output = wait_with_timeout(child, Duration::from_secs(10));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_link_is_a_usage_error() {
    let child = bin()
        .args(["request", "1202"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("request should spawn");
    let output = wait_with_timeout(child, Duration::from_secs(10));

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn request_voltage_over_udp() {
    let (addr, device) = spawn_fake_device();

    let child = bin()
        .args([
            "request",
            "--udp",
            &addr.to_string(),
            "1202",
            "--format",
            "json",
            "--handshake-attempts",
            "20",
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("request should spawn");
    let output = wait_with_timeout(child, Duration::from_secs(20));

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4985"), "stdout: {stdout}");

    device.join().expect("device thread should finish");
}
