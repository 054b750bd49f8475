use log::debug;

use crate::errors::CoreError;
use crate::models::ledger::Ledger;

use super::encryption::{self, KdfParams};
use super::format;

/// Save/load the ledger to/from encrypted bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Ledger → bincode → AES-256-GCM(Argon2id(password)) → framed file bytes.
    pub fn save_to_bytes(ledger: &Ledger, password: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_with_params(ledger, password, KdfParams::default())
    }

    /// Same as [`StorageManager::save_to_bytes`] with explicit KDF parameters.
    ///
    /// An inconsistent ledger is refused with `ValidationError` and nothing is written.
    pub fn save_with_params(ledger: &Ledger, password: &str, kdf_params: KdfParams) -> Result<Vec<u8>, CoreError> {
        ledger.check_consistency()?;

        let plaintext = bincode::serialize(ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))?;

        let salt = encryption::generate_salt()?;
        let nonce = encryption::generate_nonce()?;
        let key = encryption::derive_key(password, &salt, &kdf_params)?;
        let ciphertext = encryption::encrypt(&plaintext, &key, &nonce)?;

        debug!(
            "Saved ledger: {} positions, {} snapshots, {} encrypted bytes",
            ledger.positions.len(),
            ledger.history.len(),
            ciphertext.len()
        );
        Ok(format::write_file(format::CURRENT_VERSION, &kdf_params, &salt, &nonce, &ciphertext))
    }

    /// Framed file bytes → header → key from stored salt/params → decrypt → Ledger.
    ///
    /// A ledger that decrypts but fails [`Ledger::check_consistency`] is
    /// reported as `InvalidFileFormat`.
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<Ledger, CoreError> {
        let (header, ciphertext) = format::read_file(data)?;
        let key = encryption::derive_key(password, &header.salt, &header.kdf_params)?;
        let plaintext = encryption::decrypt(ciphertext, &key, &header.nonce)?;

        let ledger: Ledger = bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize ledger: {e}")))?;

        // Decrypted fine but breaks a store invariant: treat as a damaged file
        ledger.check_consistency().map_err(|e| match e {
            CoreError::ValidationError(msg) => CoreError::InvalidFileFormat(format!("Inconsistent ledger: {msg}")),
            other => other,
        })?;

        debug!(
            "Loaded ledger: {} positions, {} snapshots",
            ledger.positions.len(),
            ledger.history.len()
        );
        Ok(ledger)
    }

    /// Save the ledger to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(ledger: &Ledger, path: &str, password: &str) -> Result<(), CoreError> {
        std::fs::write(path, Self::save_to_bytes(ledger, password)?)?;
        Ok(())
    }

    /// Load the ledger from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Ledger, CoreError> {
        Self::load_from_bytes(&std::fs::read(path)?, password)
    }
}
