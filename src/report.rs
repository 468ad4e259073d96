//! Challenge report rendering.
//!
//! The same [`ChallengeReport`] is printed as text through `Display` or
//! serialized as JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::challenge::{Challenge, DateRange, Rejections, Score};
use crate::qso::Qso;
use crate::reader::ReaderStats;

/// Counted QSOs and points on one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandSummary {
    pub band: String,
    pub qsos: usize,
    pub points: u32,
}

/// One counted QSO, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QsoLine {
    pub date: String,
    pub time: String,
    pub callsign: String,
    pub name: String,
    pub spc: String,
    /// Challenge number with its bonus letters and extras.
    pub number: String,
    pub band: String,
    pub points: u32,
    pub bonus: u32,
}

impl From<&Qso> for QsoLine {
    fn from(qso: &Qso) -> Self {
        let mut number = format!(
            "{}{}",
            qso.number.as_deref().unwrap_or_default(),
            qso.bonus_letters
        );
        if !qso.extras.is_empty() {
            number.push(':');
            number.push_str(&qso.extras.join(","));
        }
        Self {
            date: qso.date.map(format_date).unwrap_or_default(),
            time: qso.time_on.clone().unwrap_or_default(),
            callsign: qso.callsign().to_string(),
            name: qso.name.clone().unwrap_or_default(),
            spc: qso.spc().to_string(),
            number,
            band: qso.band().to_string(),
            points: qso.points,
            bonus: qso.bonus,
        }
    }
}

/// Everything reported after scoring.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeReport {
    pub range: DateRange,
    pub score: Score,
    pub reader: ReaderStats,
    pub rejections: Rejections,
    pub bands: Vec<BandSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub qsos: Vec<QsoLine>,
}

impl ChallengeReport {
    /// Build a report for `challenge`, whose score must be current.
    pub fn new(challenge: &Challenge, score: Score, reader: ReaderStats, list_qsos: bool) -> Self {
        let mut bands: BTreeMap<&str, BandSummary> = BTreeMap::new();
        for qso in challenge.qsos() {
            let entry = bands.entry(qso.band()).or_insert_with(|| BandSummary {
                band: qso.band().to_string(),
                qsos: 0,
                points: 0,
            });
            entry.qsos += 1;
            entry.points += qso.total();
        }
        let mut bands: Vec<BandSummary> = bands.into_values().collect();
        bands.sort_by(|a, b| b.qsos.cmp(&a.qsos));

        let qsos = if list_qsos {
            let mut sorted: Vec<&Qso> = challenge.qsos().iter().collect();
            sorted.sort_by(|a, b| (a.date, &a.time_on).cmp(&(b.date, &b.time_on)));
            sorted.into_iter().map(QsoLine::from).collect()
        } else {
            Vec::new()
        };

        Self {
            range: challenge.range(),
            score,
            reader,
            rejections: challenge.rejections(),
            bands,
            qsos,
        }
    }
}

fn format_date(date: u32) -> String {
    format!("{:04}-{:02}-{:02}", date / 10_000, date / 100 % 100, date % 100)
}

impl fmt::Display for ChallengeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "═══════════════════════════════════════════════════════")?;
        writeln!(f, "                  LICW CHALLENGE SCORE")?;
        writeln!(f, "═══════════════════════════════════════════════════════")?;

        if self.range.start.is_some() || self.range.end.is_some() {
            let bound = |d: Option<u32>| d.map(format_date).unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "Dates: {} to {}",
                bound(self.range.start),
                bound(self.range.end)
            )?;
        }
        writeln!(f)?;

        if !self.qsos.is_empty() {
            writeln!(
                f,
                "{:<10} {:<5} {:<10} {:<12} {:<5} {:<14} {:<5} {:>6}",
                "Date", "Time", "Call", "Name", "SPC", "Number", "Band", "Points"
            )?;
            for q in &self.qsos {
                writeln!(
                    f,
                    "{:<10} {:<5} {:<10} {:<12} {:<5} {:<14} {:<5} {:>6}",
                    q.date,
                    q.time,
                    q.callsign,
                    q.name,
                    q.spc,
                    q.number,
                    q.band,
                    format!("{}+{}", q.points, q.bonus)
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Records read: {}", self.reader.records)?;
        writeln!(f, "Records omitted: {}", self.reader.omitted)?;
        if self.rejections.out_of_range > 0 {
            writeln!(f, "Outside dates: {}", self.rejections.out_of_range)?;
        }
        if self.rejections.duplicates > 0 {
            writeln!(f, "Duplicates: {}", self.rejections.duplicates)?;
        }
        writeln!(f)?;

        if !self.bands.is_empty() {
            writeln!(f, "QSOs by Band:")?;
            for band in &self.bands {
                writeln!(f, "  {}: {} ({} points)", band.band, band.qsos, band.points)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "QSOs: {}", self.score.qsos)?;
        writeln!(f, "SPCs: {}", self.score.spcs)?;
        writeln!(f, "Total score: {}", self.score.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qso(call: &str, band: &str, spc: &str, date: u32, time: &str) -> Qso {
        Qso {
            date: Some(date),
            time_on: Some(time.to_string()),
            band: Some(band.to_string()),
            callsign: Some(call.to_string()),
            name: Some("Op".to_string()),
            mode: Some("CW".to_string()),
            spc: Some(spc.to_string()),
            number: Some("42".to_string()),
            bonus_letters: "S".to_string(),
            extras: Vec::new(),
            points: 1,
            bonus: 3,
        }
    }

    fn sample() -> Challenge {
        let mut challenge = Challenge::new(DateRange::new(Some(20250101), Some(20250331)));
        challenge.add_qsos(vec![
            qso("W1AW", "20M", "CT", 20250210, "1500"),
            qso("K1ABC", "40M", "MA", 20250105, "0100"),
            qso("N1MM", "40M", "MA", 20250105, "0030"),
        ]);
        challenge
    }

    #[test]
    fn test_band_breakdown() {
        let mut challenge = sample();
        let score = challenge.calculate_score();
        let report = ChallengeReport::new(&challenge, score, ReaderStats::default(), false);

        assert_eq!(
            report.bands,
            vec![
                BandSummary {
                    band: "40M".to_string(),
                    qsos: 2,
                    points: 8
                },
                BandSummary {
                    band: "20M".to_string(),
                    qsos: 1,
                    points: 4
                },
            ]
        );
        assert!(report.qsos.is_empty());
    }

    #[test]
    fn test_qso_list_sorted_by_date_and_time() {
        let mut challenge = sample();
        let score = challenge.calculate_score();
        let report = ChallengeReport::new(&challenge, score, ReaderStats::default(), true);

        let calls: Vec<&str> = report.qsos.iter().map(|q| q.callsign.as_str()).collect();
        assert_eq!(calls, vec!["N1MM", "K1ABC", "W1AW"]);
        assert_eq!(report.qsos[0].date, "2025-01-05");
        assert_eq!(report.qsos[0].number, "42S");
    }

    #[test]
    fn test_number_includes_extras() {
        let mut q = qso("W1AW", "20M", "CT", 20250210, "1500");
        q.extras = vec!["F2F".to_string(), "FIRST".to_string()];
        assert_eq!(QsoLine::from(&q).number, "42S:F2F,FIRST");
    }

    #[test]
    fn test_text_output() {
        let mut challenge = sample();
        let score = challenge.calculate_score();
        let reader = ReaderStats {
            records: 5,
            omitted: 2,
        };
        let text = ChallengeReport::new(&challenge, score, reader, true).to_string();

        assert!(text.contains("Dates: 2025-01-01 to 2025-03-31"));
        assert!(text.contains("Records omitted: 2"));
        assert!(text.contains("SPCs: 2"));
        assert!(text.contains("Total score: 14"));
        assert!(text.contains("W1AW"));
    }

    #[test]
    fn test_json_output() {
        let mut challenge = sample();
        let score = challenge.calculate_score();
        let report = ChallengeReport::new(&challenge, score, ReaderStats::default(), false);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["score"]["total"], 14);
        assert_eq!(json["score"]["qsos"], 3);
        assert_eq!(json["range"]["start"], 20250101);
        assert!(json.get("qsos").is_none());
    }
}
