//! Hand-written upgrade handshake, frame codec and per-connection session.

pub mod frame;
pub mod handshake;
pub mod session;

pub use frame::{CLOSE_INTERNAL, CLOSE_NORMAL, CLOSE_UNSUPPORTED, Frame, Opcode};
pub use handshake::accept_token;
pub use session::{SessionState, StreamSession};
