use rand::{Rng, RngCore};

const RECOVERY_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 32 random bytes, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Uppercase alphanumeric code of `length` characters.
pub fn generate_recovery_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| RECOVERY_CODE_CHARSET[rng.gen_range(0..RECOVERY_CODE_CHARSET.len())] as char)
        .collect()
}
