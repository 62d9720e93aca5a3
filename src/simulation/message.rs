//! Discovery beacon wire format.
//!
//! A beacon travels as a single text line: `HELLO from <sender> to <recipient>`.

const PREFIX: &str = "HELLO from ";
const SEPARATOR: &str = " to ";

/// A neighbor-discovery beacon.
///
/// Node names must not contain whitespace; frames naming such nodes do not decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryMessage {
    pub sender: String,
    pub recipient: String,
}

impl DiscoveryMessage {
    pub fn new(sender: &str, recipient: &str) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
        }
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}{}", PREFIX, self.sender, SEPARATOR, self.recipient)
    }

    /// Decode a frame. Anything that is not a well-formed beacon yields `None`.
    pub fn decode(frame: &str) -> Option<Self> {
        let tokens: Vec<&str> = frame.split_whitespace().collect();
        match tokens.as_slice() {
            ["HELLO", "from", sender, "to", recipient] => Some(Self::new(sender, recipient)),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiscoveryMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let msg = DiscoveryMessage::new("R1", "S2");
        assert_eq!(msg.encode(), "HELLO from R1 to S2");
        assert_eq!(DiscoveryMessage::decode("HELLO from R1 to S2\n"), Some(msg));
    }

    #[test]
    fn test_decode_rejects_other_frames() {
        assert_eq!(DiscoveryMessage::decode("BYE from R1 to S2"), None);
        assert_eq!(DiscoveryMessage::decode("HELLO from R1"), None);
        assert_eq!(DiscoveryMessage::decode("HELLO from  to S2"), None);
        assert_eq!(DiscoveryMessage::decode(""), None);
    }

    #[test]
    fn test_decode_rejects_names_with_whitespace() {
        let frame = DiscoveryMessage::new("core to edge", "S2").encode();
        assert_eq!(frame, "HELLO from core to edge to S2");
        assert_eq!(DiscoveryMessage::decode(&frame), None);
        assert_eq!(DiscoveryMessage::decode("HELLO from R1 to S2 to S3"), None);
    }
}
