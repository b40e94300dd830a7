use super::{ReportableMetric, ReportableSection};
use crate::Result;
use crate::metric_source::MISSING_VALUE;
use chrono::{DateTime, Utc};
use core::fmt::Write;
use serde_json::json;

#[expect(unused_results, reason = "Map::insert intentionally overwrites values")]
pub fn generate<W: Write>(title: &str, date: DateTime<Utc>, sections: &[ReportableSection], writer: &mut W) -> Result<()> {
    let mut section_data = Vec::with_capacity(sections.len());

    for section in sections {
        let mut section_obj = serde_json::Map::new();
        section_obj.insert("id_prefix".to_string(), json!(section.id_prefix));
        section_obj.insert("title".to_string(), json!(section.title));
        if !section.subtitle.is_empty() {
            section_obj.insert("subtitle".to_string(), json!(section.subtitle));
        }
        section_obj.insert("color".to_string(), json!(section.color));
        section_obj.insert(
            "metrics".to_string(),
            json!(section.metrics.iter().map(metric_to_json).collect::<Vec<_>>()),
        );
        section_data.push(json!(section_obj));
    }

    let output = json!({
        "title": title,
        "date": date.to_rfc3339(),
        "sections": section_data
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

#[expect(clippy::float_cmp, reason = "the sentinel is assigned, never computed")]
fn metric_to_json(metric: &ReportableMetric) -> serde_json::Value {
    let value = if metric.value == MISSING_VALUE {
        serde_json::Value::Null
    } else {
        json!(metric.value)
    };

    json!({
        "id": metric.id,
        "stable_id": metric.stable_id,
        "kind": metric.kind,
        "name": metric.name,
        "subject": metric.subject,
        "status": metric.status,
        "status_start_date": metric.status_start_date.map(|date| date.to_rfc3339()),
        "value": value,
        "unit": metric.unit,
        "report": metric.report,
        "norm": metric.norm,
        "comment": metric.comment,
        "url_label": metric.url_label,
        "urls": metric.urls,
        "recent_history": metric.recent_history,
        "y_axis_range": [metric.y_axis_range.0, metric.y_axis_range.1],
    })
}
