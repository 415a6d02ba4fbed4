use crate::linking::{LinkResult, LinkStatus, LinkingReport, Linkage};
use crate::storage::repository::{BoundaryRecord, ProductionRecord, StoreStats};
use std::fmt::Write;

pub fn production_table(records: &[ProductionRecord], skipped: usize) -> String {
    if records.is_empty() {
        return with_skipped("no production records".to_string(), skipped);
    }
    let mut out = format!(
        "{:>5}  {:<16} {:<14} {:<16} {:<8} {}",
        "id", "farmer", "district", "village", "season", "crops"
    );
    for r in records {
        let _ = write!(
            out,
            "\n{:>5}  {:<16} {:<14} {:<16} {:<8} {}",
            r.id, r.farmer_id, r.district, r.village, r.season_year, r.crop_type
        );
    }
    with_skipped(out, skipped)
}

pub fn boundary_table(records: &[BoundaryRecord], skipped: usize) -> String {
    if records.is_empty() {
        return with_skipped("no field boundaries".to_string(), skipped);
    }
    let mut out = format!(
        "{:>5}  {:<16} {:<10} {:<24} {:<12} {:>6} {:>10}",
        "id", "farmer", "crop", "field", "type", "points", "hectares"
    );
    for b in records {
        let area = b
            .area_estimate
            .map(|a| format!("{a:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            out,
            "\n{:>5}  {:<16} {:<10} {:<24} {:<12} {:>6} {:>10}",
            b.id,
            b.farmer_id,
            b.crop_type,
            b.field_name,
            b.field_type,
            b.coordinates.len(),
            area
        );
    }
    with_skipped(out, skipped)
}

fn with_skipped(mut out: String, skipped: usize) -> String {
    if skipped > 0 {
        let _ = write!(out, "\n({skipped} malformed record(s) skipped)");
    }
    out
}

pub fn link_line(result: &LinkResult) -> String {
    let mut line = format!(
        "{:<28} {:<16}",
        result.key.to_string(),
        result.status().to_string()
    );
    match &result.linkage {
        Linkage::Linked { metrics, .. } => {
            let unit = metrics.harvest_unit.as_deref().unwrap_or("");
            let _ = write!(
                line,
                " {} field(s), {:.2} ha, {} {}",
                metrics.total_fields, metrics.total_area, metrics.quantity_harvested, unit
            );
            match metrics.yield_per_acre {
                Some(y) => {
                    let _ = write!(line, ", yield {y:.2}");
                }
                None => line.push_str(", yield n/a"),
            }
            let _ = write!(line, ", value {:.2}", metrics.total_value);
        }
        Linkage::ProductionOnly { production } => {
            if let Some(p) = production {
                let _ = write!(line, " production #{} ({})", p.record_id, p.season_year);
            }
        }
        Linkage::BoundariesOnly {
            total_fields,
            total_area,
            ..
        } => {
            let _ = write!(line, " {} field(s), {:.2} ha", total_fields, total_area);
        }
    }
    let fields: Vec<&str> = result
        .boundaries()
        .iter()
        .map(|b| b.field_name.as_str())
        .collect();
    if !fields.is_empty() {
        let _ = write!(line, " [{}]", fields.join(", "));
    }
    line
}

pub fn linking_report(report: &LinkingReport) -> String {
    let s = &report.summary;
    let mut out = format!(
        "keys: {}  linked: {}  production only: {}  boundaries only: {}  success: {:.1}%",
        s.total_combinations,
        s.fully_linked,
        s.production_only,
        s.boundaries_only,
        s.linking_success_rate * 100.0
    );
    let _ = write!(
        out,
        "\nrecords: {} production, {} boundary",
        s.total_production_records, s.total_boundary_records
    );
    if report.skipped_records > 0 {
        let _ = write!(out, ", {} malformed skipped", report.skipped_records);
    }

    for status in [
        LinkStatus::Linked,
        LinkStatus::ProductionOnly,
        LinkStatus::BoundariesOnly,
    ] {
        let lines: Vec<String> = report.with_status(status).map(link_line).collect();
        if !lines.is_empty() {
            let _ = write!(out, "\n\n[{status}]\n{}", lines.join("\n"));
        }
    }

    if !report.crop_analysis.is_empty() {
        out.push_str("\n\n[crops]");
        for (crop, rollup) in &report.crop_analysis {
            let avg = rollup
                .average_yield()
                .map(|y| format!("{y:.2}"))
                .unwrap_or_else(|| "n/a".to_string());
            let _ = write!(
                out,
                "\n{:<12} farmers {:>3}  fields {:>3}  {:>8.2} ha  production {:>10.2}  \
                 value {:>10.2}  avg yield {}",
                crop.as_str(),
                rollup.farmers,
                rollup.fields,
                rollup.total_area,
                rollup.total_production,
                rollup.total_value,
                avg
            );
        }
    }
    out
}

pub fn stats(stats: &StoreStats) -> String {
    format!(
        "production records: {}\nfield boundaries:   {}\ntotal records:      {}\n\
         mapped area:        {:.2} ha",
        stats.form_responses, stats.field_boundaries, stats.total_records, stats.total_mapped_area
    )
}
