use super::{ReportableSection, common};
use crate::Result;
use core::fmt::Write;
use ohno::{IntoAppError, app_err};

const HEADER: [&str; 11] = [
    "Id", "Section", "Metric", "Subject", "Status", "Since", "Value", "Report", "Norm", "Comment", "Links",
];

pub fn generate<W: Write>(sections: &[ReportableSection], writer: &mut W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    csv_writer.write_record(HEADER)?;

    for section in sections {
        for metric in &section.metrics {
            csv_writer.write_record([
                metric.id.as_str(),
                section.title.as_str(),
                metric.name.as_str(),
                metric.subject.as_str(),
                common::format_status(metric.status),
                common::format_status_start_date(metric).as_str(),
                common::format_value(metric.value, &metric.unit).as_str(),
                metric.report.as_str(),
                metric.norm.as_str(),
                metric.comment.as_str(),
                common::format_urls(&metric.urls).as_str(),
            ])?;
        }
    }

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| app_err!("could not flush CSV output: {}", e.error()))?;
    let text = String::from_utf8(bytes).into_app_err("CSV output is not valid UTF-8")?;

    write!(writer, "{text}")?;
    Ok(())
}
