//! Infrastructure implementation of the `HostSystem` port.

use std::os::unix::fs::MetadataExt;
use std::path::Path;

use anyhow::{Context, Result};
use nix::unistd::{AccessFlags, Gid, Group, access, chown, geteuid, getgroups};

use crate::application::ports::HostSystem;

/// Production host backed by the OS user database.
pub struct NixHost;

impl HostSystem for NixHost {
    fn is_privileged(&self) -> bool {
        geteuid().is_root()
    }

    fn group_of(&self, path: &Path) -> Result<String> {
        let gid = std::fs::metadata(path)
            .with_context(|| format!("cannot stat {}", path.display()))?
            .gid();
        group_name(Gid::from_raw(gid))
    }

    fn set_group(&self, path: &Path, group: &str) -> Result<()> {
        let gid = Group::from_name(group)
            .with_context(|| format!("failed to look up group {group}"))?
            .with_context(|| format!("no such group: {group}"))?
            .gid;
        chown(path, None, Some(gid))
            .with_context(|| format!("failed to set group of {}", path.display()))
    }

    fn current_groups(&self) -> Result<Vec<String>> {
        getgroups()
            .context("failed to list group memberships")?
            .into_iter()
            .map(group_name)
            .collect()
    }

    fn can_write(&self, path: &Path) -> bool {
        access(path, AccessFlags::W_OK).is_ok()
    }

    fn has_program(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Group name for `gid`, or the numeric id when the group has no entry.
fn group_name(gid: Gid) -> Result<String> {
    Ok(Group::from_gid(gid)
        .with_context(|| format!("failed to look up group {gid}"))?
        .map_or_else(|| gid.to_string(), |g| g.name))
}
