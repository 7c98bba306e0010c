//! Random asset naming.
//!
//! Thumbnails on disk and video objects in the store share the same naming
//! scheme: 32 random bytes, base64 URL-safe without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

pub fn random_asset_name() -> String {
    let mut token = [0u8; 32];
    rand::rng().fill_bytes(&mut token);
    URL_SAFE_NO_PAD.encode(token)
}
