//! Transfer module for FTP server
//!
//! Handles transfer parameters, the wire codec, passive data channel
//! negotiation and the jobs that move file contents over a data connection.

pub mod block;
pub mod codec;
pub mod job;
pub mod modes;
pub mod passive;

// Re-export key types and functions
pub use codec::{CodecError, decode, encode};
pub use job::TransferJob;
pub use modes::{DataType, FileStructure, TransferMode, TransferParams};
pub use passive::{
    PassiveChannel, accept_one, advertised_ip, bind_passive_listener, format_pasv_reply,
    parse_pasv_reply,
};
