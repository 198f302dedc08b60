mod hmac;

pub use hmac::HmacMiddlewareFactory;

/// The request header that carries the webhook signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Wandero-Hmac-SHA256";
