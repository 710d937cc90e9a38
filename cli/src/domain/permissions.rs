//! Target permission bits for files shared with the web server.

/// Owner and group read/write, others read.
pub const BASE_MODE: u32 = 0o664;
/// Set-group-id keeps new entries in the shared group.
pub const SETGID: u32 = 0o2000;
pub const EXEC_ALL: u32 = 0o111;
/// Bits compared against the target (permission bits plus setuid/setgid/sticky).
pub const MODE_MASK: u32 = 0o7777;

/// Mode a path should carry: directories get set-group-id and full
/// execute, files get full execute only when marked executable.
#[must_use]
pub fn target_mode(is_dir: bool, executable: bool) -> u32 {
    if is_dir {
        BASE_MODE | SETGID | EXEC_ALL
    } else if executable {
        BASE_MODE | EXEC_ALL
    } else {
        BASE_MODE
    }
}

/// `Some(target)` when `current` differs from the target mode.
#[must_use]
pub fn mode_correction(current: u32, is_dir: bool, executable: bool) -> Option<u32> {
    let target = target_mode(is_dir, executable);
    (current & MODE_MASK != target).then_some(target)
}
