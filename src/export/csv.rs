//! CSV report of the download history

use crate::models::DownloadEvent;

/// Byte-order mark so spreadsheet tools read the text as UTF-8
pub const BOM: char = '\u{FEFF}';

/// Time, student name, school, certificate type, format
pub const HEADERS: [&str; 5] = ["الوقت", "اسم الطالب", "المدرسة", "نوع الشهادة", "الصيغة"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render events as BOM-prefixed, comma-separated text, one row per event.
pub fn statistics_csv(events: &[DownloadEvent]) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&HEADERS.join(","));

    for event in events {
        let timestamp = event.created_at.format(TIMESTAMP_FORMAT).to_string();
        let fields = [
            timestamp.as_str(),
            event.student_name.as_str(),
            event.school_name.as_str(),
            event.certificate_type.as_str(),
            event.file_format.as_str(),
        ];

        out.push('\n');
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&escape_field(field));
        }
    }

    out
}

/// Quote a field when it holds a delimiter, quote or line break.
pub fn escape_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(day: u32, hour: u32, student: &str, school: &str, format: &str) -> DownloadEvent {
        DownloadEvent {
            id: day as i64,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap(),
            certificate_type: "excellence".to_string(),
            file_format: format.to_string(),
            student_name: student.to_string(),
            school_name: school.to_string(),
        }
    }

    #[test]
    fn test_statistics_csv_layout() {
        let events = vec![
            event(1, 10, "Ali, Omar", "Al Noor School", "pdf"),
            event(2, 11, "Sara", "Future School", "png"),
        ];

        let csv = statistics_csv(&events);
        assert!(csv.starts_with('\u{FEFF}'));

        let lines: Vec<&str> = csv.trim_start_matches(BOM).split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "الوقت,اسم الطالب,المدرسة,نوع الشهادة,الصيغة");
        assert_eq!(lines[0].split(',').count(), 5);
        assert_eq!(
            lines[1],
            "2024-01-01 10:00:00,\"Ali, Omar\",Al Noor School,excellence,pdf"
        );
        assert_eq!(lines[2], "2024-01-02 11:00:00,Sara,Future School,excellence,png");
    }

    #[test]
    fn test_empty_history_is_header_only() {
        let csv = statistics_csv(&[]);
        assert_eq!(csv, format!("{}{}", BOM, HEADERS.join(",")));
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }
}
