//! In-process transport for actor mailboxes.
//!
//! Each actor binds one inbound endpoint (an unbounded MPSC channel) in a
//! shared [`ChannelNetwork`]. Peers send by cloning the sender registered
//! under the recipient's name; only the owner drains the receiver.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use super::SimulationError;

/// One encoded message on the wire
pub type Frame = String;

/// Errors from a single send. Actors swallow these.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("no address known for {0}")]
    UnknownPeer(String),

    #[error("endpoint of {0} is closed")]
    Closed(String),
}

/// What an actor needs from its transport
pub trait Transport: Send {
    /// Fire-and-forget delivery of `frame` to `peer`'s inbound queue
    fn send(&self, peer: &str, frame: Frame) -> Result<(), TransportError>;

    /// Take every frame currently queued for this actor
    fn drain_inbound(&self) -> Vec<Frame>;
}

/// Registry of bound inbound endpoints
#[derive(Debug, Default)]
pub struct ChannelNetwork {
    endpoints: Mutex<HashMap<String, Sender<Frame>>>,
}

impl ChannelNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the inbound endpoint for `node`.
    ///
    /// Fails if `node` already holds an endpoint.
    pub fn bind(&self, node: &str) -> Result<Receiver<Frame>, SimulationError> {
        let mut endpoints = self.endpoints.lock();
        if endpoints.contains_key(node) {
            return Err(SimulationError::EndpointUnavailable {
                node: node.to_string(),
            });
        }
        let (tx, rx) = unbounded();
        endpoints.insert(node.to_string(), tx);
        Ok(rx)
    }

    /// Address of a bound endpoint
    pub fn address_of(&self, node: &str) -> Option<Sender<Frame>> {
        self.endpoints.lock().get(node).cloned()
    }

    /// Build the transport for `node`, resolving the addresses of `neighbors`.
    ///
    /// Neighbors without a bound endpoint are left out.
    pub fn connect(&self, node: &str, inbox: Receiver<Frame>, neighbors: &[String]) -> ChannelTransport {
        let endpoints = self.endpoints.lock();
        let peers = neighbors
            .iter()
            .filter_map(|nb| match endpoints.get(nb) {
                Some(tx) => Some((nb.clone(), tx.clone())),
                None => {
                    log::debug!("{}: neighbor {} has no endpoint", node, nb);
                    None
                }
            })
            .collect();
        ChannelTransport { inbox, peers }
    }

    /// Drop every registered address. Endpoints close once their owners exit.
    pub fn close(&self) {
        self.endpoints.lock().clear();
    }
}

/// Transport backed by crossbeam channels
#[derive(Debug)]
pub struct ChannelTransport {
    inbox: Receiver<Frame>,
    peers: HashMap<String, Sender<Frame>>,
}

impl ChannelTransport {
    /// Names this transport can reach
    pub fn peers(&self) -> impl Iterator<Item = &str> {
        self.peers.keys().map(String::as_str)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, peer: &str, frame: Frame) -> Result<(), TransportError> {
        let tx = self
            .peers
            .get(peer)
            .ok_or_else(|| TransportError::UnknownPeer(peer.to_string()))?;
        tx.send(frame).map_err(|_| TransportError::Closed(peer.to_string()))
    }

    fn drain_inbound(&self) -> Vec<Frame> {
        self.inbox.try_iter().collect()
    }
}
