//! Admin gate credentials

use sha2::{Digest, Sha256};

use crate::config::Config;

/// Decides whether a typed password opens the admin view.
pub trait CredentialCheck: Send + Sync {
    fn verify(&self, candidate: &str) -> bool;
}

/// Single shared password, kept only as its SHA-256 digest.
pub struct SharedSecret {
    digest: [u8; 32],
}

impl SharedSecret {
    pub fn new(secret: &str) -> Self {
        Self { digest: hash(secret) }
    }

    /// `ADMIN_PASSWORD`, when configured
    pub fn from_config(config: &Config) -> Option<Self> {
        config.admin_password.as_deref().map(Self::new)
    }
}

impl CredentialCheck for SharedSecret {
    fn verify(&self, candidate: &str) -> bool {
        let candidate = hash(candidate);
        // Compare every byte regardless of where the first mismatch is
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Used when no admin password is configured.
pub struct DenyAll;

impl CredentialCheck for DenyAll {
    fn verify(&self, _candidate: &str) -> bool {
        false
    }
}

fn hash(value: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_shared_secret() {
        let gate = SharedSecret::new("open sesame");
        assert!(gate.verify("open sesame"));
        assert!(!gate.verify("open sesame "));
        assert!(!gate.verify(""));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config {
            port: 0,
            storage: Err(ConfigError::StorageMissing("STORAGE_URL")),
            admin_password: None,
            environment: "test".to_string(),
        };
        assert!(SharedSecret::from_config(&config).is_none());

        config.admin_password = Some("letmein".to_string());
        assert!(SharedSecret::from_config(&config).unwrap().verify("letmein"));
    }

    #[test]
    fn test_deny_all() {
        assert!(!DenyAll.verify("anything"));
    }
}
