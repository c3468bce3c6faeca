// ABOUTME: GPX 1.1 rendering of a finished session's recorded path
// ABOUTME: One track with one segment, plus a summary waypoint at the start position
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::{self, Write as _};

use trackline_core::constants::service_names;
use trackline_core::models::{SessionPayload, SportKind, TrackPoint};

const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
const GPX_SCHEMA_LOCATION: &str =
    "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// A session ready to be written as GPX
///
/// Rendered through `Display`, so `to_string()` yields the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct GpxDocument {
    name: String,
    sport: SportKind,
    started_at: Option<DateTime<Utc>>,
    points: Vec<TrackPoint>,
    distance_km: f64,
    duration_ms: i64,
    elevation_gain_m: f64,
    max_speed_kmh: f64,
    avg_speed_kmh: f64,
}

impl GpxDocument {
    /// Document for a finalized session payload
    #[must_use]
    pub fn from_payload(payload: &SessionPayload) -> Self {
        let day = payload
            .started_at
            .map(|at| at.format(" %Y-%m-%d").to_string())
            .unwrap_or_default();
        Self {
            name: format!("{}{day}", payload.sport.display_name()),
            sport: payload.sport,
            started_at: payload.started_at,
            points: payload.tracking_path.clone(),
            distance_km: payload.distance,
            duration_ms: payload.duration,
            elevation_gain_m: payload.elevation_gain,
            max_speed_kmh: payload.max_speed,
            avg_speed_kmh: payload.avg_speed,
        }
    }

    /// Override the track name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of track points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the track has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn summary(&self) -> String {
        format!(
            "Distance: {:.2} km | Duration: {} | Gain: +{:.0} m | Max speed: {:.1} km/h | Avg speed: {:.1} km/h",
            self.distance_km,
            format_duration(self.duration_ms),
            self.elevation_gain_m,
            self.max_speed_kmh,
            self.avg_speed_kmh
        )
    }
}

impl fmt::Display for GpxDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = escape_xml(&self.name);
        let mut out = String::new();

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<gpx version="1.1" creator="{}" xmlns="{GPX_NAMESPACE}" xmlns:xsi="{XSI_NAMESPACE}" xsi:schemaLocation="{GPX_SCHEMA_LOCATION}">"#,
            service_names::TRACKLINE
        )?;

        writeln!(out, "  <metadata>")?;
        writeln!(out, "    <name>{name}</name>")?;
        if let Some(started_at) = self.started_at {
            writeln!(out, "    <time>{}</time>", format_time(started_at))?;
        }
        writeln!(out, "  </metadata>")?;

        if let Some(first) = self.points.first() {
            writeln!(
                out,
                r#"  <wpt lat="{:.7}" lon="{:.7}">"#,
                first.latitude, first.longitude
            )?;
            writeln!(out, "    <name>Summary - {name}</name>")?;
            writeln!(out, "    <desc>{}</desc>", escape_xml(&self.summary()))?;
            writeln!(out, "    <type>summary</type>")?;
            writeln!(out, "  </wpt>")?;
        }

        writeln!(out, "  <trk>")?;
        writeln!(out, "    <name>{name}</name>")?;
        writeln!(out, "    <type>{}</type>", self.sport)?;
        writeln!(out, "    <trkseg>")?;
        for point in &self.points {
            writeln!(
                out,
                r#"      <trkpt lat="{:.7}" lon="{:.7}">"#,
                point.latitude, point.longitude
            )?;
            if let Some(altitude) = point.altitude {
                writeln!(out, "        <ele>{altitude:.1}</ele>")?;
            }
            writeln!(out, "        <time>{}</time>", format_time(point.timestamp))?;
            writeln!(out, "      </trkpt>")?;
        }
        writeln!(out, "    </trkseg>")?;
        writeln!(out, "  </trk>")?;
        write!(out, "</gpx>")?;

        f.write_str(&out)
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `H:MM:SS`
fn format_duration(duration_ms: i64) -> String {
    let total_secs = duration_ms.max(0) / 1000;
    format!(
        "{}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&#39;");
    }

    #[test]
    fn duration_format() {
        assert_eq!(format_duration(3_723_000), "1:02:03");
        assert_eq!(format_duration(-5), "0:00:00");
    }
}
