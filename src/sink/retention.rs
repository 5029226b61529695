//! Rotated log file naming and retention
//!
//! A backup of `app.log` is named `app-2024-01-01T00-00-00.000.log`, stamped in
//! UTC at the moment of rotation. Backups are aged by the stamp in their name,
//! not by file metadata.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::config::RotationPolicy;

/// Timestamp format embedded in backup names
pub const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// Ages above this are treated as this many days
const MAX_AGE_DAYS: u64 = 1_000_000;

/// A rotated log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub path: PathBuf,
    pub rotated_at: DateTime<Utc>,
}

/// Outcome of a retention pass
#[derive(Debug, Default)]
pub struct PruneReport {
    /// Backups deleted
    pub removed: Vec<PathBuf>,
    /// Backups that could not be deleted
    pub failed: Vec<(PathBuf, io::Error)>,
}

/// `(prefix, suffix)` around the timestamp, e.g. `("app-", ".log")`
fn name_parts(active: &Path) -> (String, String) {
    let stem = active
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = active
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (format!("{}-", stem), ext)
}

/// Path a backup of `active` rotated at `at` would get
pub fn backup_path(active: &Path, at: DateTime<Utc>) -> PathBuf {
    let (prefix, suffix) = name_parts(active);
    let name = format!("{}{}{}", prefix, at.format(BACKUP_TIME_FORMAT), suffix);
    active.with_file_name(name)
}

/// Backup path for a rotation at `at`. The stamp is kept later than every
/// existing backup and bumped by a millisecond until the name is free, so
/// rotations within one millisecond still sort in order.
pub fn unused_backup_path(active: &Path, mut at: DateTime<Utc>) -> PathBuf {
    if let Some(newest) = list_backups(active).ok().and_then(|b| b.into_iter().next()) {
        if newest.rotated_at >= at {
            at = newest.rotated_at + Duration::milliseconds(1);
        }
    }
    loop {
        let candidate = backup_path(active, at);
        if !candidate.exists() {
            return candidate;
        }
        at += Duration::milliseconds(1);
    }
}

/// Rotation time encoded in a backup file name, if `name` is a backup of `active`
pub fn parse_backup_time(active: &Path, name: &str) -> Option<DateTime<Utc>> {
    let (prefix, suffix) = name_parts(active);
    let stamp = name.strip_prefix(&prefix)?.strip_suffix(&suffix)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// List backups of `active`, newest first
pub fn list_backups(active: &Path) -> io::Result<Vec<Backup>> {
    let dir = match active.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        // Only process backups of this log file
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(rotated_at) = parse_backup_time(active, name) else {
            continue;
        };
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            backups.push(Backup { path, rotated_at });
        }
    }

    backups.sort_by(|a, b| b.rotated_at.cmp(&a.rotated_at));
    Ok(backups)
}

/// Delete a single backup file
pub fn remove_backup(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// Delete backups beyond `max_backups`, then any left that are older than
/// `max_age_days` as of `now`.
pub fn prune_backups(
    active: &Path,
    policy: &RotationPolicy,
    now: DateTime<Utc>,
) -> io::Result<PruneReport> {
    prune_backups_with(active, policy, now, remove_backup)
}

/// Same as [`prune_backups`] but deleting through `remove`. A failed removal
/// is recorded in the report and the remaining backups are still processed.
pub fn prune_backups_with(
    active: &Path,
    policy: &RotationPolicy,
    now: DateTime<Utc>,
    mut remove: impl FnMut(&Path) -> io::Result<()>,
) -> io::Result<PruneReport> {
    let mut report = PruneReport::default();
    if policy.max_backups == 0 && policy.max_age_days == 0 {
        return Ok(report);
    }

    let mut keep = list_backups(active)?;
    let mut doomed = Vec::new();

    if policy.max_backups > 0 && keep.len() > policy.max_backups {
        doomed.extend(keep.split_off(policy.max_backups));
    }

    if policy.max_age_days > 0 {
        let max_age = Duration::days(policy.max_age_days.min(MAX_AGE_DAYS) as i64);
        let cutoff = now
            .checked_sub_signed(max_age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        doomed.extend(keep.into_iter().filter(|b| b.rotated_at < cutoff));
    }

    for backup in doomed {
        match remove(&backup.path) {
            Ok(()) => report.removed.push(backup.path),
            Err(e) => report.failed.push((backup.path, e)),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        File::create(path).unwrap().write_all(b"test").unwrap();
    }

    fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        now - Duration::days(days)
    }

    #[test]
    fn test_backup_path_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let path = backup_path(Path::new("/var/log/app.log"), at);
        assert_eq!(
            path,
            PathBuf::from("/var/log/app-2024-01-02T03-04-05.000.log")
        );
    }

    #[test]
    fn test_parse_backup_time() {
        let active = Path::new("logs/app.log");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            parse_backup_time(active, "app-2024-01-02T03-04-05.000.log"),
            Some(at)
        );
        assert_eq!(parse_backup_time(active, "app.log"), None);
        assert_eq!(parse_backup_time(active, "other-2024-01-02T03-04-05.000.log"), None);
        assert_eq!(parse_backup_time(active, "app-not-a-time.log"), None);
    }

    #[test]
    fn test_unused_backup_path_skips_existing() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        touch(&backup_path(&active, at));

        let next = unused_backup_path(&active, at);
        assert_eq!(next, backup_path(&active, at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_unused_backup_path_stays_after_newest() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        touch(&backup_path(&active, at + Duration::milliseconds(5)));

        let next = unused_backup_path(&active, at);
        assert_eq!(next, backup_path(&active, at + Duration::milliseconds(6)));
    }

    #[test]
    fn test_list_backups_newest_first_ignores_others() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let now = Utc::now();

        touch(&active);
        touch(&temp_dir.path().join("other.txt"));
        touch(&temp_dir.path().join("worker-2024-01-01T00-00-00.000.log"));
        touch(&backup_path(&active, days_ago(now, 3)));
        touch(&backup_path(&active, days_ago(now, 1)));
        touch(&backup_path(&active, days_ago(now, 2)));

        let backups = list_backups(&active).unwrap();
        assert_eq!(backups.len(), 3);
        assert!(backups[0].rotated_at > backups[1].rotated_at);
        assert!(backups[1].rotated_at > backups[2].rotated_at);
    }

    #[test]
    fn test_list_backups_nonexistent_dir() {
        let backups = list_backups(Path::new("/nonexistent/path/for/testing/app.log")).unwrap();
        assert!(backups.is_empty());
    }

    #[test]
    fn test_prune_by_count_keeps_newest() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let now = Utc::now();
        for hours in 1..=5 {
            touch(&backup_path(&active, now - Duration::hours(hours)));
        }

        let policy = RotationPolicy::new(1, 2, 0);
        let report = prune_backups(&active, &policy, now).unwrap();
        assert_eq!(report.removed.len(), 3);
        assert!(report.failed.is_empty());

        let left = list_backups(&active).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left[0].path, backup_path(&active, now - Duration::hours(1)));
        assert_eq!(left[1].path, backup_path(&active, now - Duration::hours(2)));
    }

    #[test]
    fn test_prune_by_age() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let now = Utc::now();
        let recent = backup_path(&active, days_ago(now, 1));
        let old = backup_path(&active, days_ago(now, 30));
        touch(&recent);
        touch(&old);

        let policy = RotationPolicy::new(1, 10, 7);
        let report = prune_backups(&active, &policy, now).unwrap();
        assert_eq!(report.removed, vec![old.clone()]);
        assert!(recent.exists());
        assert!(!old.exists());
    }

    #[test]
    fn test_prune_unbounded_keeps_everything() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let now = Utc::now();
        for days in [1, 100, 1000] {
            touch(&backup_path(&active, days_ago(now, days)));
        }

        let policy = RotationPolicy::new(1, 0, 0);
        let report = prune_backups(&active, &policy, now).unwrap();
        assert!(report.removed.is_empty());
        assert_eq!(list_backups(&active).unwrap().len(), 3);
    }

    #[test]
    fn test_prune_records_failed_removal_and_continues() {
        let temp_dir = TempDir::new().unwrap();
        let active = temp_dir.path().join("app.log");
        let now = Utc::now();
        for hours in 1..=4 {
            touch(&backup_path(&active, now - Duration::hours(hours)));
        }
        let locked = backup_path(&active, now - Duration::hours(3));

        let policy = RotationPolicy::new(1, 1, 0);
        let report = prune_backups_with(&active, &policy, now, |path| {
            if path == locked {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "in use"))
            } else {
                remove_backup(path)
            }
        })
        .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, locked);
        assert_eq!(report.failed[0].1.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(report.removed.len(), 2);
        assert!(locked.exists());
        assert_eq!(list_backups(&active).unwrap().len(), 2);
    }
}
