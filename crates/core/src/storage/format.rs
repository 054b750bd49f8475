use super::encryption::KdfParams;
use crate::errors::CoreError;

/// Magic bytes identifying a Wealth Tracker ledger file.
pub const MAGIC: &[u8; 4] = b"WLTH";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Fixed header size in bytes:
/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8) = 54
pub const HEADER_SIZE: usize = 54;

/// Accepted Argon2 parameter ranges. Anything outside is treated as a
/// crafted file rather than burning memory/CPU on it.
const MEMORY_COST_RANGE: std::ops::RangeInclusive<u32> = 8..=1_048_576;
const TIME_COST_RANGE: std::ops::RangeInclusive<u32> = 1..=20;
const PARALLELISM_RANGE: std::ops::RangeInclusive<u32> = 1..=16;

/// Header of an encrypted ledger file.
#[derive(Debug)]
pub struct FileHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; 16],
    pub nonce: [u8; 12],
    pub ciphertext_len: u64,
}

/// Frame a ciphertext into a complete ledger file.
///
/// Layout (all integers little-endian):
/// ```text
/// [WLTH: 4B] [version: 2B] [memory_cost: 4B] [time_cost: 4B] [parallelism: 4B]
/// [salt: 16B] [nonce: 12B] [ciphertext_len: 8B] [ciphertext + GCM tag]
/// ```
pub fn write_file(
    version: u16,
    kdf_params: &KdfParams,
    salt: &[u8; 16],
    nonce: &[u8; 12],
    ciphertext: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    for param in [kdf_params.memory_cost, kdf_params.time_cost, kdf_params.parallelism] {
        buf.extend_from_slice(&param.to_le_bytes());
    }
    buf.extend_from_slice(salt);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(&(ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(ciphertext);
    buf
}

/// Parse and validate the header. Returns it with the ciphertext slice.
pub fn read_file(data: &[u8]) -> Result<(FileHeader, &[u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(format!(
            "File too small to be a ledger: {} bytes, header needs {HEADER_SIZE}",
            data.len()
        )));
    }

    let mut reader = HeaderReader { data, offset: 0 };

    if reader.take::<4>()? != *MAGIC {
        return Err(CoreError::InvalidFileFormat("Invalid magic bytes — not a ledger file".into()));
    }

    let version = u16::from_le_bytes(reader.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(reader.take()?),
        time_cost: u32::from_le_bytes(reader.take()?),
        parallelism: u32::from_le_bytes(reader.take()?),
    };
    check_range("memory_cost", kdf_params.memory_cost, MEMORY_COST_RANGE)?;
    check_range("time_cost", kdf_params.time_cost, TIME_COST_RANGE)?;
    check_range("parallelism", kdf_params.parallelism, PARALLELISM_RANGE)?;

    let salt: [u8; 16] = reader.take()?;
    let nonce: [u8; 12] = reader.take()?;
    let ciphertext_len = u64::from_le_bytes(reader.take()?);

    let body = &data[reader.offset..];
    let len = usize::try_from(ciphertext_len)
        .ok()
        .filter(|len| *len <= body.len())
        .ok_or_else(|| {
            CoreError::InvalidFileFormat(format!(
                "File truncated: header announces {ciphertext_len} bytes of ciphertext, found {}",
                body.len()
            ))
        })?;

    let header = FileHeader {
        version,
        kdf_params,
        salt,
        nonce,
        ciphertext_len,
    };
    Ok((header, &body[..len]))
}

struct HeaderReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl HeaderReader<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let end = self.offset + N;
        let bytes: [u8; N] = self
            .data
            .get(self.offset..end)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat(format!("Header truncated at byte {}", self.offset)))?;
        self.offset = end;
        Ok(bytes)
    }
}

fn check_range(name: &str, value: u32, range: std::ops::RangeInclusive<u32>) -> Result<(), CoreError> {
    if !range.contains(&value) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF {name} out of safe range: {value} (expected {}..={})",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}
