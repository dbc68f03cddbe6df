//! Bounded readiness polling for freshly started services
//!
//! A fixed-duration sleep guarantees nothing about a container that is
//! still booting. This polls the actual signal — a TCP accept — with
//! growing delays, bounded by a deadline.

use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time;

const BASE_DELAY: Duration = Duration::from_millis(500);
const MAX_DELAY: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
#[error("{host}:{port} not accepting connections after {waited:.1?}")]
pub struct ReadinessTimeout {
    host: String,
    port: u16,
    waited: Duration,
}

/// Poll a TCP endpoint until it accepts a connection or the deadline
/// passes.
pub async fn wait_for_tcp(host: &str, port: u16, deadline: Duration) -> Result<(), ReadinessTimeout> {
    let started = time::Instant::now();
    let mut attempt: u32 = 0;
    loop {
        if let Ok(Ok(_)) = time::timeout(CONNECT_TIMEOUT, TcpStream::connect((host, port))).await {
            return Ok(());
        }
        attempt += 1;
        let delay = (BASE_DELAY * attempt).min(MAX_DELAY);
        if started.elapsed() + delay > deadline {
            return Err(ReadinessTimeout {
                host: host.to_string(),
                port,
                waited: started.elapsed(),
            });
        }
        time::sleep(delay).await;
    }
}
