//! Authenticated remote command execution
//!
//! One capability: open an SSH session to a host, run a single command
//! to completion, and return the captured stdout/stderr streams as
//! line sequences. The connection is released on every exit path.
//!
//! A non-zero remote exit is a normal [`ExecutionResult`], never a
//! channel error; [`RemoteError::Execution`] is reserved for the
//! channel itself breaking mid-command.

pub mod channel;
pub mod error;
pub mod result;

pub use channel::{Credential, HostKeyPolicy, RemoteChannel};
pub use error::{RemoteError, Result};
pub use result::ExecutionResult;
