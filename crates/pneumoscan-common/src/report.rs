//! Plain-text rendering of an analysis for the "Download Full Report" action.

use chrono::{DateTime, Utc};

use crate::models::AnalysisResult;

/// Render `result` as a plain-text report. Absent fields are omitted.
pub fn render_plain_report(
    result: &AnalysisResult,
    source_file: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str("PNEUMONIA ANALYSIS REPORT\n");
    out.push_str("=========================\n\n");
    if !source_file.is_empty() {
        out.push_str(&format!("Image:        {}\n", source_file));
    }
    out.push_str(&format!("Generated:    {}\n\n", generated_at.format("%Y-%m-%d %H:%M UTC")));

    if let Some(diagnosis) = &result.diagnosis {
        out.push_str(&format!("Prediction:   {}\n", diagnosis));
    }
    if let Some(confidence) = &result.confidence {
        out.push_str(&format!("Confidence:   {}\n", confidence));
    }

    if let Some(report) = result.report() {
        out.push_str("\nSTRUCTURED REPORT\n-----------------\n");
        let sections = [
            ("Biological Causes", &report.biological_causes),
            ("Pathological Analysis", &report.pathological_analysis),
            ("Environmental Factors", &report.environmental_factors),
        ];
        for (title, body) in sections {
            if let Some(body) = body {
                out.push_str(&format!("\n{}:\n{}\n", title, body));
            }
        }
    }

    if let Some(blip) = &result.blip_report {
        out.push_str("\nDETAILED REPORT\n---------------\n");
        out.push_str(blip);
        out.push('\n');
    }

    out
}

/// Attachment name for a report generated from `source_file`,
/// e.g. `xray.png` → `xray-report.txt`.
pub fn report_file_name(source_file: &str) -> String {
    let stem = source_file
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(source_file);
    let safe: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if safe.is_empty() {
        "pneumonia-report.txt".to_string()
    } else {
        format!("{}-report.txt", safe)
    }
}
