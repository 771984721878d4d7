use std::collections::HashSet;

use regex::Regex;

use super::FormatDescriptor;
use crate::api::RawFormat;

const UNKNOWN: &str = "unknown";

/// Turns the raw variants reported by the extractor into the list offered to
/// the user: filtered, deduplicated and sorted by descending height.
pub fn build_format_list(raw_formats: &[RawFormat]) -> Vec<FormatDescriptor> {
    let mut seen = HashSet::new();
    let mut formats: Vec<FormatDescriptor> = raw_formats
        .iter()
        .filter_map(describe)
        .filter(|format| seen.insert((format.display_label.clone(), format.format_id.clone())))
        .collect();

    // sort_by_key is stable, equal heights keep their first-seen order
    formats.sort_by_key(|format| std::cmp::Reverse(parse_height(&format.display_label).unwrap_or(0)));
    formats
}

/// Reads the trailing `<N>p` token of a label, e.g. `720` from `"hd - mp4 - 720p"`.
pub fn parse_height(label: &str) -> Option<u32> {
    let re = Regex::new(r"(?:^|-)\s*(\d+)p\s*$").ok()?;
    let caps = re.captures(label)?;
    caps[1].parse().ok()
}

fn describe(raw: &RawFormat) -> Option<FormatDescriptor> {
    let has_video = raw.vcodec.as_deref() != Some("none");
    let has_audio = raw.acodec.as_deref() != Some("none");
    let ext = raw.ext.as_deref().unwrap_or(UNKNOWN);

    match raw.height.filter(|height| *height > 0) {
        Some(height) if has_video => Some(FormatDescriptor {
            display_label: format!(
                "{} - {} - {}p",
                raw.format_note.as_deref().unwrap_or(UNKNOWN),
                ext,
                height
            ),
            format_id: raw.format_id.clone(),
            height_px: Some(height),
            bitrate_kbps: None,
        }),
        _ if has_audio && !has_video => {
            let bitrate = raw.abr.map(|abr| abr.round() as u32);
            let bitrate_text = bitrate
                .map(|kbps| kbps.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string());

            Some(FormatDescriptor {
                display_label: format!("Audio Only - {} - {}kbps", ext, bitrate_text),
                format_id: raw.format_id.clone(),
                height_px: None,
                bitrate_kbps: bitrate,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, vcodec: &str, height: u32, ext: &str, note: &str) -> RawFormat {
        RawFormat {
            format_id: id.to_string(),
            vcodec: Some(vcodec.to_string()),
            acodec: Some("none".to_string()),
            ext: Some(ext.to_string()),
            height: Some(height),
            abr: None,
            format_note: Some(note.to_string()),
        }
    }

    fn audio(id: &str, acodec: &str, abr: Option<f64>, ext: &str) -> RawFormat {
        RawFormat {
            format_id: id.to_string(),
            vcodec: Some("none".to_string()),
            acodec: Some(acodec.to_string()),
            ext: Some(ext.to_string()),
            height: None,
            abr,
            format_note: None,
        }
    }

    #[test]
    fn test_video_entries_precede_audio() {
        let raw = vec![
            video("136", "avc1", 720, "mp4", "720p"),
            audio("mp3-128", "mp3", Some(128.0), "mp3"),
            video("247", "vp9", 720, "webm", "720p"),
        ];

        let formats = build_format_list(&raw);
        let labels: Vec<&str> = formats.iter().map(|f| f.display_label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "720p - mp4 - 720p",
                "720p - webm - 720p",
                "Audio Only - mp3 - 128kbps"
            ]
        );
        assert_eq!(formats[0].format_id, "136");
        assert_eq!(formats[1].format_id, "247");
        assert_eq!(formats[2].bitrate_kbps, Some(128));
    }

    #[test]
    fn test_sorted_by_descending_height() {
        let raw = vec![
            video("160", "avc1", 144, "mp4", "144p"),
            audio("140", "mp4a", Some(129.478), "m4a"),
            video("137", "avc1", 1080, "mp4", "1080p"),
            video("18", "avc1", 360, "mp4", "360p"),
        ];

        let heights: Vec<u32> = build_format_list(&raw)
            .iter()
            .map(|f| parse_height(&f.display_label).unwrap_or(0))
            .collect();
        assert_eq!(heights, vec![1080, 360, 144, 0]);
    }

    #[test]
    fn test_duplicates_removed_keeping_first() {
        let raw = vec![
            video("22", "avc1", 720, "mp4", "720p"),
            video("22", "avc1", 720, "mp4", "720p"),
            video("22", "avc1", 720, "webm", "720p"),
        ];

        let formats = build_format_list(&raw);
        assert_eq!(formats.len(), 2);
        let pairs: HashSet<(String, String)> = formats
            .iter()
            .map(|f| (f.display_label.clone(), f.format_id.clone()))
            .collect();
        assert_eq!(pairs.len(), formats.len());
    }

    #[test]
    fn test_unusable_variants_dropped() {
        let raw = vec![
            // storyboard: no codecs at all
            RawFormat {
                format_id: "sb0".to_string(),
                vcodec: Some("none".to_string()),
                acodec: Some("none".to_string()),
                ext: Some("mhtml".to_string()),
                height: Some(90),
                abr: None,
                format_note: Some("storyboard".to_string()),
            },
            // video without a known height
            RawFormat {
                format_id: "hls".to_string(),
                vcodec: Some("avc1".to_string()),
                acodec: Some("mp4a".to_string()),
                ext: Some("mp4".to_string()),
                height: None,
                abr: None,
                format_note: None,
            },
        ];

        assert!(build_format_list(&raw).is_empty());
    }

    #[test]
    fn test_missing_fields_render_unknown() {
        let raw = vec![
            RawFormat {
                format_id: "0".to_string(),
                vcodec: None,
                acodec: None,
                ext: None,
                height: Some(480),
                abr: None,
                format_note: None,
            },
            audio("1", "opus", None, "webm"),
        ];

        let formats = build_format_list(&raw);
        assert_eq!(formats[0].display_label, "unknown - unknown - 480p");
        assert_eq!(formats[1].display_label, "Audio Only - webm - unknownkbps");
        assert_eq!(formats[1].bitrate_kbps, None);
    }

    #[test]
    fn test_parse_height() {
        assert_eq!(parse_height("720p60 - mp4 - 720p"), Some(720));
        assert_eq!(parse_height("Audio Only - mp3 - 128kbps"), None);
        assert_eq!(parse_height("1080p"), Some(1080));
        assert_eq!(parse_height("premium - mp4 - p"), None);
    }
}
