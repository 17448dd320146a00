//! Text scraping of remote command output into raw readings.

/// Device names that mark pseudo-filesystems `df` reports but nobody wants
/// disk alerts for.
const PSEUDO_FILESYSTEMS: &[&str] = &["tmpfs", "devtmpfs", "overlay", "squashfs", "udev"];

#[derive(Debug, Clone, PartialEq)]
pub struct DiskUsage {
    pub mount: String,
    pub used_percent: f32,
}

/// Output of `top -bn1 | grep 'Cpu(s)' | awk '{print $2 + $4}'`: a single
/// number already summed on the remote side.
pub(crate) fn parse_cpu_percent(raw: &str) -> Option<f32> {
    raw.trim().parse().ok()
}

/// Output of `free | grep Mem`: `Mem: total used free shared buff/cache avail`.
pub(crate) fn parse_memory_percent(raw: &str) -> Option<f32> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }

    let total: f64 = parts[1].parse().ok()?;
    let used: f64 = parts[2].parse().ok()?;
    if total <= 0.0 {
        return None;
    }
    Some(((used * 100.0) / total) as f32)
}

/// Output of `df -P`: header line plus one row per filesystem. Pseudo
/// filesystems and unparsable rows are skipped.
pub(crate) fn parse_disk_usage(raw: &str) -> Vec<DiskUsage> {
    raw.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 6 || parts[0] == "Filesystem" {
                return None;
            }

            let filesystem = parts[0];
            if PSEUDO_FILESYSTEMS
                .iter()
                .any(|pseudo| filesystem.starts_with(pseudo))
            {
                return None;
            }

            let used_percent: f32 = parts[4].trim_end_matches('%').parse().ok()?;
            Some(DiskUsage {
                mount: parts[5].to_string(),
                used_percent,
            })
        })
        .collect()
}

/// Output of `systemctl is-active <name>`: "active" means up, anything else
/// ("inactive", "failed", "unknown") means down.
pub(crate) fn service_is_active(raw: &str) -> bool {
    raw.trim() == "active"
}

#[cfg(test)]
mod tests {
    use super::{
        parse_cpu_percent, parse_disk_usage, parse_memory_percent, service_is_active, DiskUsage,
    };

    #[test]
    fn cpu_output_is_a_bare_number() {
        assert_eq!(parse_cpu_percent("12.5\n"), Some(12.5));
        assert_eq!(parse_cpu_percent("  3.0  "), Some(3.0));
        assert_eq!(parse_cpu_percent(""), None);
        assert_eq!(parse_cpu_percent("Cpu(s): garbage"), None);
    }

    #[test]
    fn memory_percent_from_free_row() {
        let raw = "Mem:        16284068     8142034     1234567      123456     7000000     7654321";
        let percent = parse_memory_percent(raw).expect("parsable");
        assert!((percent - 50.0).abs() < 0.1);

        assert_eq!(parse_memory_percent("Mem: 0 0"), None);
        assert_eq!(parse_memory_percent("not free output"), None);
    }

    #[test]
    fn df_rows_skip_header_and_pseudo_filesystems() {
        let raw = "\
Filesystem     1024-blocks      Used Available Capacity Mounted on
/dev/sda1        102400000  87040000  15360000      85% /
/dev/sdb1        512000000  46080000 465920000      10% /data
tmpfs              8142034         0   8142034       0% /dev/shm
devtmpfs           8142034         0   8142034       0% /dev
overlay          102400000  87040000  15360000      85% /var/lib/docker/overlay2/abc/merged
";
        let disks = parse_disk_usage(raw);
        assert_eq!(
            disks,
            vec![
                DiskUsage { mount: "/".to_string(), used_percent: 85.0 },
                DiskUsage { mount: "/data".to_string(), used_percent: 10.0 },
            ]
        );
    }

    #[test]
    fn df_rows_with_too_few_fields_are_skipped() {
        let disks = parse_disk_usage("/dev/sda1 100 200\n\n");
        assert!(disks.is_empty());
    }

    #[test]
    fn service_state_only_active_counts_as_up() {
        assert!(service_is_active("active\n"));
        assert!(!service_is_active("inactive\n"));
        assert!(!service_is_active("failed\n"));
        assert!(!service_is_active(""));
    }
}
