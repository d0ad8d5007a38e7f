/// Portable view of a child's exit status: a normal exit code, a signal, or
/// the shell-convention launch-failure codes (126 not executable, 127 not
/// found).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Exited(i32),
    Signaled(i32),
    LaunchFailure(i32),
}

impl From<std::process::ExitStatus> for ExitKind {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return match code {
                126 | 127 => ExitKind::LaunchFailure(code),
                code => ExitKind::Exited(code),
            };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(sig) = status.signal() {
                return ExitKind::Signaled(sig);
            }
        }
        ExitKind::Exited(1)
    }
}
