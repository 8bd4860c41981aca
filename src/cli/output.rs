use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json;
use std::path::Path;

use crate::common::format::{self, format_distance, format_path};
use crate::duplicates::{ClusterId, DuplicateCluster, ScanReport};

/// Result of comparing two images directly
#[derive(Debug, Clone)]
pub struct Comparison {
    pub distance: f64,
    pub threshold: f64,
    pub psnr: f64,
    pub mssim: [f64; 3],
}

fn visible_clusters(report: &ScanReport, duplicates_only: bool) -> Vec<(ClusterId, &DuplicateCluster)> {
    if duplicates_only {
        report.duplicates_only()
    } else {
        report.clusters.iter().enumerate().collect()
    }
}

/// Print scan results in human-readable format
pub fn print_scan_results(report: &ScanReport, duplicates_only: bool, detailed: bool) {
    println!();
    println!("  {} imgcompare Duplicate Scan", "🖼️");
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  Scanned {} in {}  •  similarity {:.0}% (max distance {:.1})",
        format::format_count(report.images_processed).cyan(),
        format::format_duration(report.duration_secs).cyan(),
        report.threshold.similarity_percent(),
        report.threshold.value(),
    );
    if report.cancelled {
        println!(
            "  {} Scan cancelled after {} of {} images",
            "⚠".yellow(),
            report.images_processed,
            report.images_total
        );
    }
    println!("{}", "─".repeat(60).dimmed());
    println!();

    let clusters = visible_clusters(report, duplicates_only);
    let with_dups = report.duplicates_only().len();

    if report.clusters.is_empty() {
        println!("  {} No images found.", "✨");
    } else if with_dups == 0 {
        println!("  {} No duplicates found!", "✨");
    }

    if !clusters.is_empty() && (with_dups > 0 || !duplicates_only) {
        println!(
            "  {} {} ({} groups, {} with duplicates)",
            "●".cyan(),
            "Image Groups".bold(),
            report.clusters.len(),
            with_dups,
        );
        println!();
        println!("    {:>4}  {:>7}  {}", "#".dimmed(), "members".dimmed(), "representative".dimmed());

        for (id, cluster) in &clusters {
            let count = cluster.member_count();
            let count_str = if count == 0 {
                count.to_string().dimmed()
            } else {
                count.to_string().yellow().bold()
            };
            println!(
                "    {:>4}  {:>7}  {}",
                group_label(*id).bold(),
                count_str,
                format_path(cluster.representative_path()).green(),
            );

            if detailed {
                for member in cluster.members() {
                    println!("                 {} {}", "dup →".dimmed(), format_path(member).dimmed());
                }
            }
        }
        println!();

        if with_dups > 0 {
            println!(
                "  {} Each group is anchored on its first image; members matched that image,",
                "ℹ".blue()
            );
            println!("    not necessarily each other. An image can appear in several groups.");
            if !detailed {
                println!("    Run with {} to see duplicate paths", "--detailed".cyan());
            }
            println!();
        }
    }

    print_failures(report);
}

/// Group number as shown to users; the same index the JSON `index` field carries
fn group_label(id: ClusterId) -> String {
    format!("#{}", id)
}

fn print_failures(report: &ScanReport) {
    if report.failures.is_empty() {
        return;
    }
    println!(
        "  {} {} skipped",
        "⚠".yellow(),
        format::format_count(report.failures.len()).yellow()
    );
    for failure in &report.failures {
        println!("    {} {}", "✗".red(), failure.error);
    }
    println!();
}

fn cluster_json(id: ClusterId, cluster: &DuplicateCluster) -> serde_json::Value {
    serde_json::json!({
        "index": id,
        "representative": cluster.representative_path().display().to_string(),
        "member_count": cluster.member_count(),
        "members": cluster.members().iter().map(|m| m.display().to_string()).collect::<Vec<_>>(),
    })
}

/// Build the JSON document for a scan
pub fn scan_json(report: &ScanReport, duplicates_only: bool) -> serde_json::Value {
    serde_json::json!({
        "scanned_at": chrono::Local::now().to_rfc3339(),
        "images_total": report.images_total,
        "images_processed": report.images_processed,
        "images_fingerprinted": report.images_fingerprinted,
        "similarity": report.threshold.similarity_percent(),
        "threshold": report.threshold.value(),
        "duration_secs": report.duration_secs,
        "cancelled": report.cancelled,
        "total_groups": report.clusters.len(),
        "total_duplicates": report.total_duplicates(),
        "groups": visible_clusters(report, duplicates_only)
            .into_iter()
            .map(|(id, c)| cluster_json(id, c))
            .collect::<Vec<_>>(),
        "skipped": report.failures.iter().map(|f| {
            serde_json::json!({
                "path": f.path.display().to_string(),
                "kind": f.error.kind(),
                "error": f.error.to_string(),
            })
        }).collect::<Vec<_>>(),
    })
}

pub fn print_scan_json(report: &ScanReport, duplicates_only: bool) {
    match serde_json::to_string_pretty(&scan_json(report, duplicates_only)) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error serializing: {}", e),
    }
}

/// One line per group with duplicates: representative, then members, tab separated
pub fn print_scan_quiet(report: &ScanReport) {
    for (_, cluster) in report.duplicates_only() {
        let mut line = cluster.representative_path().display().to_string();
        for member in cluster.members() {
            line.push('\t');
            line.push_str(&member.display().to_string());
        }
        println!("{}", line);
    }
}

/// Print a direct comparison of two images
pub fn print_comparison(first: &Path, second: &Path, cmp: &Comparison) {
    println!();
    println!("  {} imgcompare", "🔍");
    println!("{}", "─".repeat(60).dimmed());
    println!("  {}", format_path(first).cyan());
    println!("  {}", format_path(second).cyan());
    println!("{}", "─".repeat(60).dimmed());
    format::print_kv("Fingerprint distance", &format_distance(cmp.distance, cmp.threshold).to_string());
    let verdict = if cmp.distance <= cmp.threshold {
        "duplicate".green().bold()
    } else {
        "different".red()
    };
    format::print_kv("Verdict", &format!("{} (max distance {:.1})", verdict, cmp.threshold));
    let psnr = if cmp.psnr == 0.0 {
        "identical".to_string()
    } else {
        format!("{:.2} dB", cmp.psnr)
    };
    format::print_kv("PSNR", &psnr);
    format::print_kv(
        "MSSIM (R, G, B)",
        &format!("{:.4}, {:.4}, {:.4}", cmp.mssim[0], cmp.mssim[1], cmp.mssim[2]),
    );
    println!();
}

pub fn print_comparison_json(first: &Path, second: &Path, cmp: &Comparison) {
    let json = serde_json::json!({
        "first": first.display().to_string(),
        "second": second.display().to_string(),
        "distance": cmp.distance,
        "threshold": cmp.threshold,
        "duplicate": cmp.distance <= cmp.threshold,
        "psnr": cmp.psnr,
        "mssim": cmp.mssim,
    });
    match serde_json::to_string_pretty(&json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error serializing: {}", e),
    }
}

// ── Progress helpers ──────────────────────────────────────────────────────────

pub fn make_progress(show: bool, msg: &str) -> Option<ProgressBar> {
    if show {
        let pb = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        {
            pb.set_style(style.progress_chars("━━░"));
        }
        pb.set_message(msg.to_string());
        Some(pb)
    } else {
        None
    }
}

pub fn finish_progress(pb: Option<ProgressBar>, msg: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::fingerprint::{Fingerprint, FINGERPRINT_LEN};
    use crate::duplicates::{ImageRecord, Scanner, SimilarityThreshold};
    use crate::duplicates::buffer::PixelBuffer;
    use crate::common::errors::{ScanError, ScanResult};
    use std::path::PathBuf;

    fn sample_report() -> ScanReport {
        let decoder = |p: &Path| -> ScanResult<PixelBuffer> {
            match p.to_str() {
                Some("broken.png") => Err(ScanError::decode(p, "truncated")),
                Some(name) if name.starts_with('a') => PixelBuffer::new(2, 2, 1, vec![10; 4]),
                _ => PixelBuffer::new(2, 2, 1, vec![10, 250, 30, 90]),
            }
        };
        let paths: Vec<PathBuf> = ["a1.png", "b.png", "broken.png", "a2.png"]
            .iter()
            .map(PathBuf::from)
            .collect();
        Scanner::new(SimilarityThreshold::default())
            .parallel(false)
            .with_decoder(decoder)
            .run(&paths, |_| {})
    }

    #[test]
    fn test_scan_json_shape() {
        let report = sample_report();
        let json = scan_json(&report, false);
        assert_eq!(json["images_total"], 4);
        assert_eq!(json["total_groups"], 2);
        assert_eq!(json["groups"][0]["representative"], "a1.png");
        assert_eq!(json["groups"][0]["members"][0], "a2.png");
        assert_eq!(json["skipped"][0]["kind"], "decode_failure");
    }

    #[test]
    fn test_scan_json_duplicates_only_keeps_indices() {
        let report = sample_report();
        let json = scan_json(&report, true);
        let groups = json["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["index"], 0);
    }

    #[test]
    fn test_human_label_matches_json_index() {
        let report = sample_report();
        let json = scan_json(&report, true);
        let (id, _) = report.duplicates_only()[0];
        assert_eq!(group_label(id), format!("#{}", json["groups"][0]["index"]));
        assert_eq!(group_label(1), "#1");
    }

    #[test]
    fn test_cluster_json() {
        let record = ImageRecord::new("r.png", Fingerprint::from_values([0.0; FINGERPRINT_LEN]));
        let mut clusterer = crate::duplicates::DuplicateClusterer::default();
        clusterer.insert(record.clone());
        clusterer.insert(ImageRecord::new("m.png", record.fingerprint.clone()));
        let json = cluster_json(0, &clusterer.clusters()[0]);
        assert_eq!(json["member_count"], 1);
        assert_eq!(json["members"][0], "m.png");
    }
}
