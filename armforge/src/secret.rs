use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// A value that must never reach logs or generated documents in plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Box<str>);

impl Secret {
    pub fn new(value: impl Into<Box<str>>) -> Self {
        Self(value.into())
    }

    /// The marker written into generated documents in place of the plaintext
    /// value.
    pub fn digest_marker(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.0.as_bytes());
        format!(
            "blake3:{}",
            URL_SAFE_NO_PAD.encode(hasher.finalize().as_bytes())
        )
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[test]
fn digest_marker_test() {
    let marker = Secret::new("hunter2").digest_marker();
    println!("{}", marker);
    // 32 hash bytes encode to 43 characters without padding.
    assert_eq!(marker.len(), "blake3:".len() + 43);
    assert!(marker.starts_with("blake3:"));
    assert!(!marker.contains("hunter2"));

    assert_eq!(marker, Secret::new("hunter2").digest_marker());
    assert_ne!(marker, Secret::new("hunter3").digest_marker());
}

#[test]
fn debug_is_redacted_test() {
    let secret = Secret::new("hunter2");
    assert_eq!(format!("{:?}", secret), "Secret(***)");
}
