use anyhow::Context;
use targetcore::interface::BearingResult;
use targetcore::orchestrator::Publisher;
use targetcore::prelude::{StageError, StageResult};

/// ZeroMQ PUB socket. Subscribers connect whenever they like; each bearing
/// goes out as one bare text frame with no topic and no acknowledgement.
pub struct ZmqPublisher {
    socket: zmq::Socket,
    endpoint: String,
}

impl ZmqPublisher {
    /// Binds `endpoint`, e.g. `tcp://*:5800`. A wildcard port is resolved and
    /// reported by [`ZmqPublisher::endpoint`].
    pub fn bind(endpoint: &str) -> anyhow::Result<Self> {
        let context = zmq::Context::new();
        let socket = context
            .socket(zmq::PUB)
            .context("creating publisher socket")?;
        socket.set_linger(0).context("setting publisher linger")?;
        socket
            .bind(endpoint)
            .with_context(|| format!("binding publisher on {}", endpoint))?;
        let endpoint = socket
            .get_last_endpoint()
            .context("reading bound endpoint")?
            .unwrap_or_else(|_| endpoint.to_string());
        Ok(Self { socket, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Publisher for ZmqPublisher {
    fn publish(&mut self, result: &BearingResult) -> StageResult<()> {
        self.socket
            .send(result.message().as_bytes(), zmq::DONTWAIT)
            .map_err(|err| StageError::Publish(format!("{}: {}", self.endpoint, err)))
    }
}

/// Writes each bearing message as a line on stdout.
#[derive(Default)]
pub struct StdoutPublisher;

impl Publisher for StdoutPublisher {
    fn publish(&mut self, result: &BearingResult) -> StageResult<()> {
        println!("{}", result.message());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_subscriber_receives_bare_angle_frames() {
        let mut publisher = ZmqPublisher::bind("tcp://127.0.0.1:*").unwrap();
        assert!(!publisher.endpoint().ends_with(":*"));

        let context = zmq::Context::new();
        let subscriber = context.socket(zmq::SUB).unwrap();
        subscriber.set_subscribe(b"").unwrap();
        subscriber.set_rcvtimeo(100).unwrap();
        subscriber.connect(publisher.endpoint()).unwrap();

        let bearing = BearingResult {
            angle_radians: (50.0f64 / 476.7).atan(),
            pixel_x: 450,
            pixel_y: 300,
            area: 3721,
        };
        // the subscription reaches the publisher asynchronously
        let mut received = None;
        for _ in 0..50 {
            publisher.publish(&bearing).unwrap();
            if let Ok(Ok(message)) = subscriber.recv_string(0) {
                received = Some(message);
                break;
            }
        }
        assert_eq!(received.as_deref(), Some("0.1045"));
        assert!(!subscriber.get_rcvmore().unwrap());
    }

    #[test]
    fn publishing_without_subscribers_succeeds() {
        let mut publisher = ZmqPublisher::bind("tcp://127.0.0.1:*").unwrap();
        let bearing = BearingResult {
            angle_radians: -0.25,
            pixel_x: 1,
            pixel_y: 2,
            area: 300,
        };
        assert!(publisher.publish(&bearing).is_ok());
    }

    #[test]
    fn malformed_endpoint_is_rejected() {
        assert!(ZmqPublisher::bind("not an endpoint").is_err());
    }
}
