use chrono::NaiveDateTime;

use crate::models::{ScoredPlace, SearchParams};

/// UTF-8 byte-order mark so spreadsheet tools detect the encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: [&str; 7] = [
    "rank",
    "name",
    "address",
    "phone",
    "mention_count",
    "confidence",
    "status",
];

const MISSING: &str = "N/A";

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Confidence as a percentage with one decimal, e.g. `51.0%`
pub fn format_percentage(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// Render a ranked result list as CSV bytes, BOM included
pub fn export_csv(places: &[ScoredPlace]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push_str("\r\n");

    for (idx, scored) in places.iter().enumerate() {
        let row = [
            (idx + 1).to_string(),
            escape_csv(&scored.place.name),
            escape_csv(&scored.place.address),
            escape_csv(scored.place.phone.as_deref().unwrap_or(MISSING)),
            scored.mention_count.to_string(),
            format_percentage(scored.confidence),
            escape_csv(&scored.status_label),
        ];
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }

    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + out.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(out.as_bytes());
    bytes
}

/// Download name such as `Gangnam_bakery_bread_results_20240601_093000.csv`
pub fn export_filename(params: &SearchParams, at: NaiveDateTime) -> String {
    let sanitize = |s: &str| s.replace(['/', '\\', '"', ' '], "_");
    format!(
        "{}_{}_{}_results_{}.csv",
        sanitize(&params.location),
        sanitize(&params.category),
        sanitize(&params.product),
        at.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceLevel, Place};
    use chrono::NaiveDate;

    fn scored(name: &str, phone: Option<&str>, confidence: f64) -> ScoredPlace {
        let level = ConfidenceLevel::from_confidence(confidence);
        ScoredPlace {
            place: Place {
                name: name.to_string(),
                address: "Seoul Gangnam-gu".to_string(),
                road_address: None,
                phone: phone.map(str::to_string),
                latitude: 37.5,
                longitude: 127.0,
                category: None,
                distance: None,
                url: None,
            },
            confidence,
            level,
            status_label: level.label("bread"),
            mention_count: 4,
        }
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_starts_with_bom_and_header() {
        let bytes = export_csv(&[]);
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "rank,name,address,phone,mention_count,confidence,status\r\n");
    }

    #[test]
    fn test_export_rows() {
        let places = vec![
            scored("Bakery, Main", Some("02-123-4567"), 0.51),
            scored("떡집", None, 0.0),
        ];
        let bytes = export_csv(&places);
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "1,\"Bakery, Main\",Seoul Gangnam-gu,02-123-4567,4,51.0%,moderate likelihood of selling bread"
        );
        assert!(lines[2].starts_with("2,떡집,Seoul Gangnam-gu,N/A,4,0.0%,"));
    }

    #[test]
    fn test_export_filename() {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let params = SearchParams::new("강남구", "떡집", "시루떡");

        assert_eq!(
            export_filename(&params, at),
            "강남구_떡집_시루떡_results_20240601_093000.csv"
        );
    }
}
