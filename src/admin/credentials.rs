use subtle::ConstantTimeEq;

use crate::utils::hash_password;

/// Source of truth for admin logins.
pub trait CredentialStore: Send + Sync {
    fn verify(&self, admin_id: &str, password: &str) -> bool;
}

/// A single admin account. Only the password digest is kept in memory.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    admin_id: String,
    password_digest: String,
}

impl StaticCredentials {
    pub fn new<S: Into<String>>(admin_id: S, password: &str) -> Self {
        Self::from_digest(admin_id, &hash_password(password))
    }

    pub fn from_digest<S: Into<String>>(admin_id: S, password_digest: &str) -> Self {
        Self {
            admin_id: admin_id.into(),
            password_digest: password_digest.to_ascii_lowercase(),
        }
    }
}

impl CredentialStore for StaticCredentials {
    fn verify(&self, admin_id: &str, password: &str) -> bool {
        let id_ok = admin_id.as_bytes().ct_eq(self.admin_id.as_bytes());
        let password_ok = hash_password(password)
            .as_bytes()
            .ct_eq(self.password_digest.as_bytes());
        (id_ok & password_ok).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        let store = StaticCredentials::new("ramya21", "2003");
        assert!(store.verify("ramya21", "2003"));
        assert!(!store.verify("ramya21", "2004"));
        assert!(!store.verify("Ramya21", "2003"));
        assert!(!store.verify("", ""));
    }

    #[test]
    fn near_miss_digests_fail() {
        let digest = hash_password("2003");

        let mut flipped = digest.clone().into_bytes();
        let last = flipped.len() - 1;
        flipped[last] = if flipped[last] == b'0' { b'1' } else { b'0' };
        let flipped = String::from_utf8(flipped).unwrap();
        assert!(!StaticCredentials::from_digest("ramya21", &flipped).verify("ramya21", "2003"));

        let truncated = &digest[..digest.len() - 2];
        assert!(!StaticCredentials::from_digest("ramya21", truncated).verify("ramya21", "2003"));

        let padded = format!("{}00", digest);
        assert!(!StaticCredentials::from_digest("ramya21", &padded).verify("ramya21", "2003"));

        assert!(StaticCredentials::from_digest("ramya21", &digest).verify("ramya21", "2003"));
        assert!(!StaticCredentials::from_digest("ramya21", &digest).verify("ramya2", "2003"));
    }

    #[test]
    fn usable_as_trait_object() {
        let store: Box<dyn CredentialStore> = Box::new(StaticCredentials::new("a", "b"));
        assert!(store.verify("a", "b"));
    }
}
