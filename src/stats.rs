//! Aggregate stats projection over a log collection.
//!
//! Pure and side-effect free: counts and top-N lists are recomputed from
//! the entries handed in on every invocation, nothing is cached.

use std::collections::HashMap;

use crate::types::{FirewallLogEntry, IpCount, LogStats};

/// Top-N list length used by the HTTP surface when none is requested.
pub const DEFAULT_TOP_N: usize = 5;

/// Computes the read-only summary for a collection of log entries.
///
/// Action and severity counting matches case-insensitively, consistent
/// with how those fields are validated. Ties in the top-N frequency lists
/// are broken by first-seen order.
pub fn project_stats(entries: &[FirewallLogEntry], top_n: usize) -> LogStats {
    let mut allowed_count = 0;
    let mut denied_count = 0;
    let mut dropped_count = 0;
    let mut critical_count = 0;
    let mut warning_count = 0;

    for entry in entries {
        if entry.action.eq_ignore_ascii_case("ALLOW") {
            allowed_count += 1;
        } else if entry.action.eq_ignore_ascii_case("DENY") {
            denied_count += 1;
        } else if entry.action.eq_ignore_ascii_case("DROP") {
            dropped_count += 1;
        }

        if entry.severity.eq_ignore_ascii_case("critical") {
            critical_count += 1;
        } else if entry.severity.eq_ignore_ascii_case("warning") {
            warning_count += 1;
        }
    }

    LogStats {
        total_logs: entries.len() as u64,
        allowed_count,
        denied_count,
        dropped_count,
        critical_count,
        warning_count,
        top_source_ips: top_ips(entries.iter().map(|e| e.source_ip.as_str()), top_n),
        top_destination_ips: top_ips(entries.iter().map(|e| e.destination_ip.as_str()), top_n),
    }
}

/// Ranks the `top_n` most frequent values. Occurrence order decides ties:
/// the stable sort keeps earlier-seen addresses ahead of equal counts.
fn top_ips<'a>(addresses: impl Iterator<Item = &'a str>, top_n: usize) -> Vec<IpCount> {
    let mut order: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for ip in addresses {
        match index.get(ip) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(ip, order.len());
                order.push((ip, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(top_n)
        .map(|(ip, count)| IpCount {
            ip: ip.to_string(),
            count,
        })
        .collect()
}
