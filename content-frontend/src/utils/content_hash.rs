use sha2::{Digest, Sha256};

/// Content address of a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAddress {
    /// `sha256:<hex>`
    pub hash: String,
    /// `urn:sha256:<hex>`
    pub pointer: String,
}

pub fn content_address(content: &str) -> ContentAddress {
    let digest = hex::encode(Sha256::digest(content.as_bytes()));

    ContentAddress {
        hash: format!("sha256:{}", digest),
        pointer: format!("urn:sha256:{}", digest),
    }
}
