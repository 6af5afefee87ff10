//! Agent Commerce Kit: verifiable agent identity (ACK-ID) and agent payments (ACK-Pay).
pub use ack_did as did;
pub use ack_http as http;
pub use ack_id as id;
pub use ack_jwt as jwt;
pub use ack_keys as keys;
pub use ack_pay as pay;
pub use ack_vc as vc;
