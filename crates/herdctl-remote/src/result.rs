//! Per-host execution outcome

/// Captured outcome of one remote command on one host.
///
/// Transient: produced per call, never persisted. `succeeded` is true
/// iff the remote command wrote nothing to stderr; the exit status is
/// carried alongside for callers that want it.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub target_host: String,
    pub standard_output: Vec<String>,
    pub standard_error: Vec<String>,
    pub exit_status: Option<u32>,
    pub succeeded: bool,
}

impl ExecutionResult {
    /// Build a result from raw captured streams.
    pub fn from_streams(
        target_host: impl Into<String>,
        stdout: &[u8],
        stderr: &[u8],
        exit_status: Option<u32>,
    ) -> Self {
        let standard_output = split_lines(stdout);
        let standard_error = split_lines(stderr);
        let succeeded = standard_error.is_empty();
        Self {
            target_host: target_host.into(),
            standard_output,
            standard_error,
            exit_status,
            succeeded,
        }
    }

    /// A failed result carrying an error message, used when the
    /// channel to a host could not be established at all.
    pub fn failure(target_host: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target_host: target_host.into(),
            standard_output: Vec::new(),
            standard_error: vec![message.into()],
            exit_status: None,
            succeeded: false,
        }
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return Vec::new();
    }
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}
