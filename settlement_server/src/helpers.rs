use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Computes the base64-encoded HMAC-SHA256 signature of `data` under `secret`. This is the signature scheme
/// used for incoming webhook deliveries.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data);
    base64::encode(mac.finalize().into_bytes())
}
