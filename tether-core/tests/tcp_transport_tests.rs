use std::io::Read;
use std::net::TcpListener;
use std::thread;
use tether_core::{Endpoint, FailoverConnector, FailoverError, ResilientWriter, TcpTransport};

/// A localhost port with nothing listening on it
fn dead_endpoint() -> Endpoint {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Endpoint::new("127.0.0.1", port)
}

#[test]
fn test_tcp_failover_and_delivery() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let live = Endpoint::new("127.0.0.1", listener.local_addr().unwrap().port());

    let server = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).unwrap();
        received
    });

    let connector = FailoverConnector::new(
        TcpTransport::new().with_nodelay(true),
        vec![dead_endpoint(), live.clone()],
    );
    let mut writer = ResilientWriter::new(connector);

    assert_eq!(writer.force_connect().unwrap(), live);
    writer.write(b"hello ").unwrap();
    writer.write(b"world").unwrap();
    writer.disconnect();

    assert_eq!(server.join().unwrap(), b"hello world".to_vec());
    assert_eq!(writer.connector().stats().endpoint_failures, 1);
}

#[test]
fn test_tcp_all_unreachable() {
    let endpoints = vec![dead_endpoint(), dead_endpoint()];
    let mut connector = FailoverConnector::new(TcpTransport::new(), endpoints.clone());

    match connector.force_connect() {
        Err(FailoverError::AllEndpointsUnreachable { endpoints: attempted }) => {
            assert_eq!(attempted, endpoints);
        }
        other => panic!("expected AllEndpointsUnreachable, got {:?}", other),
    }
    assert!(!connector.is_connected());
}

#[test]
fn test_tcp_unresolvable_host_fails_over() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let live = Endpoint::new("127.0.0.1", listener.local_addr().unwrap().port());

    let mut connector = FailoverConnector::new(
        TcpTransport::new(),
        vec![Endpoint::new("host.invalid", 80), live.clone()],
    );

    assert_eq!(connector.force_connect().unwrap(), live);
}
