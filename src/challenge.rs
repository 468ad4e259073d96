//! LICW challenge aggregation.
//!
//! Each station may be counted once per band. When the same (callsign,
//! band) pair appears more than once the higher-scoring QSO is kept, and on
//! a tie the one seen first. The final score is the sum of every kept QSO's
//! points plus one point per distinct SPC.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::qso::Qso;

/// Inclusive YYYYMMDD bounds. An unset bound imposes no restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl DateRange {
    pub fn new(start: Option<u32>, end: Option<u32>) -> Self {
        Self { start, end }
    }

    /// Whether `date` lies within both bounds.
    pub fn contains(&self, date: u32) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Result of [`Challenge::calculate_score`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Points from all counted QSOs plus the SPC bonus.
    pub total: u32,
    /// Number of counted QSOs.
    pub qsos: usize,
    /// Number of distinct SPCs among counted QSOs.
    pub spcs: usize,
}

/// Records that did not make it into the challenge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rejections {
    /// Outside the date range.
    pub out_of_range: u64,
    /// Not scorable (missing fields or not CW).
    pub invalid: u64,
    /// Duplicates of a (callsign, band) pair, whether replaced or discarded.
    pub duplicates: u64,
}

/// Accumulates QSOs and computes the challenge score.
#[derive(Debug, Default)]
pub struct Challenge {
    range: DateRange,
    /// Counted QSOs in first-seen order.
    qsos: Vec<Qso>,
    /// (callsign, band) to index in `qsos`.
    index: HashMap<(String, String), usize>,
    rejections: Rejections,
    score: Option<Score>,
}

impl Challenge {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            ..Default::default()
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Add a batch of QSOs, invalidating any previously calculated score.
    pub fn add_qsos(&mut self, qsos: impl IntoIterator<Item = Qso>) {
        self.score = None;
        for qso in qsos {
            self.add_qso(qso);
        }
    }

    fn add_qso(&mut self, qso: Qso) {
        let Some(date) = qso.date.filter(|_| qso.is_valid()) else {
            self.rejections.invalid += 1;
            return;
        };
        if !self.range.contains(date) {
            self.rejections.out_of_range += 1;
            debug!("{} on {} is outside the challenge dates", qso.callsign(), date);
            return;
        }

        let key = (qso.callsign().to_string(), qso.band().to_string());
        match self.index.get(&key) {
            None => {
                self.index.insert(key, self.qsos.len());
                self.qsos.push(qso);
            }
            Some(&i) => {
                self.rejections.duplicates += 1;
                let existing = &mut self.qsos[i];
                if qso.total() > existing.total() {
                    debug!(
                        "Replacing {} on {} ({} points) with a {} point QSO",
                        key.0,
                        key.1,
                        existing.total(),
                        qso.total()
                    );
                    *existing = qso;
                }
            }
        }
    }

    /// Compute the score from the current contents.
    pub fn calculate_score(&mut self) -> Score {
        let spcs: HashSet<&str> = self.qsos.iter().map(Qso::spc).collect();
        let points: u32 = self.qsos.iter().map(Qso::total).sum();
        let score = Score {
            total: points + spcs.len() as u32,
            qsos: self.qsos.len(),
            spcs: spcs.len(),
        };
        self.score = Some(score);
        score
    }

    /// The last calculated score, or `None` if QSOs were added since.
    pub fn score(&self) -> Option<Score> {
        self.score
    }

    /// Counted QSOs in first-seen order.
    pub fn qsos(&self) -> &[Qso] {
        &self.qsos
    }

    pub fn rejections(&self) -> Rejections {
        self.rejections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn qso(call: &str, band: &str, spc: &str, date: u32, points: u32, bonus: u32) -> Qso {
        Qso {
            date: Some(date),
            time_on: Some("1200".to_string()),
            band: Some(band.to_string()),
            callsign: Some(call.to_string()),
            name: Some("Op".to_string()),
            mode: Some("CW".to_string()),
            spc: Some(spc.to_string()),
            number: Some("1".to_string()),
            bonus_letters: String::new(),
            extras: Vec::new(),
            points,
            bonus,
        }
    }

    #[test]
    fn test_score_adds_one_per_spc() {
        let mut challenge = Challenge::default();
        challenge.add_qsos(vec![
            qso("W1AW", "20M", "CT", 20250110, 1, 0),
            qso("K2LCW", "20M", "NY", 20250110, 5, 3),
            qso("N2XYZ", "40M", "NY", 20250111, 1, 0),
        ]);
        let score = challenge.calculate_score();

        assert_eq!(score.total, 1 + 8 + 1 + 2);
        assert_eq!(score.qsos, 3);
        assert_eq!(score.spcs, 2);
    }

    #[test]
    fn test_same_call_different_band_both_count() {
        let mut challenge = Challenge::default();
        challenge.add_qsos(vec![
            qso("W1AW", "20M", "CT", 20250110, 1, 0),
            qso("W1AW", "40M", "CT", 20250110, 1, 0),
        ]);
        assert_eq!(challenge.calculate_score().qsos, 2);
    }

    #[test]
    fn test_duplicate_keeps_higher_total() {
        let mut challenge = Challenge::default();
        challenge.add_qsos(vec![qso("W1AW", "20M", "CT", 20250110, 1, 0)]);
        challenge.add_qsos(vec![qso("W1AW", "20M", "CT", 20250112, 1, 3)]);

        assert_eq!(challenge.qsos().len(), 1);
        assert_eq!(challenge.qsos()[0].total(), 4);
        assert_eq!(challenge.qsos()[0].date, Some(20250112));
        assert_eq!(challenge.rejections().duplicates, 1);
    }

    #[test]
    fn test_duplicate_tie_keeps_first() {
        let mut challenge = Challenge::default();
        challenge.add_qsos(vec![
            qso("W1AW", "20M", "CT", 20250110, 2, 0),
            qso("W1AW", "20M", "RI", 20250111, 1, 1),
            qso("W1AW", "20M", "MA", 20250112, 1, 0),
        ]);

        assert_eq!(challenge.qsos().len(), 1);
        assert_eq!(challenge.qsos()[0].spc(), "CT");
    }

    #[test]
    fn test_date_range_inclusive() {
        let mut challenge = Challenge::new(DateRange::new(Some(20250101), Some(20250331)));
        challenge.add_qsos(vec![
            qso("A1A", "20M", "CT", 20241231, 1, 0),
            qso("B1B", "20M", "CT", 20250101, 1, 0),
            qso("C1C", "20M", "CT", 20250331, 1, 0),
            qso("D1D", "20M", "CT", 20250401, 1, 0),
        ]);

        let calls: Vec<&str> = challenge.qsos().iter().map(Qso::callsign).collect();
        assert_eq!(calls, vec!["B1B", "C1C"]);
        assert_eq!(challenge.rejections().out_of_range, 2);
    }

    #[test]
    fn test_open_bounds() {
        let start_only = DateRange::new(Some(20250101), None);
        assert!(start_only.contains(29991231));
        assert!(!start_only.contains(20241231));

        let end_only = DateRange::new(None, Some(20250101));
        assert!(end_only.contains(19000101));
        assert!(!end_only.contains(20250102));

        assert!(DateRange::default().contains(0));
    }

    #[test]
    fn test_invalid_qsos_rejected() {
        let mut bad = qso("W1AW", "20M", "CT", 20250110, 1, 0);
        bad.mode = Some("FT8".to_string());
        let mut undated = qso("K1ABC", "20M", "CT", 20250110, 1, 0);
        undated.date = None;

        let mut challenge = Challenge::default();
        challenge.add_qsos(vec![bad, undated]);
        assert!(challenge.qsos().is_empty());
        assert_eq!(challenge.rejections().invalid, 2);
    }

    #[test]
    fn test_score_invalidated_by_add() {
        let mut challenge = Challenge::default();
        assert_eq!(challenge.score(), None);

        challenge.add_qsos(vec![qso("W1AW", "20M", "CT", 20250110, 1, 0)]);
        let first = challenge.calculate_score();
        assert_eq!(challenge.score(), Some(first));

        challenge.add_qsos(vec![qso("K1ABC", "20M", "MA", 20250110, 1, 0)]);
        assert_eq!(challenge.score(), None);
        assert_eq!(challenge.calculate_score().total, 4);
    }

    #[test]
    fn test_empty_challenge() {
        let score = Challenge::default().calculate_score();
        assert_eq!(score, Score::default());
    }

    proptest! {
        #[test]
        fn prop_dedup_keeps_max(a in 0u32..20, b in 0u32..20, c in 0u32..20, d in 0u32..20) {
            let mut challenge = Challenge::default();
            challenge.add_qsos(vec![
                qso("W1AW", "20M", "CT", 20250110, a, b),
                qso("W1AW", "20M", "RI", 20250111, c, d),
            ]);

            prop_assert_eq!(challenge.qsos().len(), 1);
            let kept = &challenge.qsos()[0];
            prop_assert_eq!(kept.total(), (a + b).max(c + d));
            if a + b >= c + d {
                prop_assert_eq!(kept.spc(), "CT");
            }
        }

        #[test]
        fn prop_total_is_points_plus_spcs(
            entries in prop::collection::vec(("[A-C][0-9]", "(20M|40M)", "(CT|NY|USA)", 1u32..6), 0..20)
        ) {
            let mut challenge = Challenge::default();
            challenge.add_qsos(
                entries
                    .iter()
                    .map(|(call, band, spc, pts)| qso(call, band, spc, 20250110, *pts, 0)),
            );
            let score = challenge.calculate_score();

            let kept = challenge.qsos();
            let spcs: HashSet<&str> = kept.iter().map(Qso::spc).collect();
            let points: u32 = kept.iter().map(Qso::total).sum();
            prop_assert_eq!(score.total, points + spcs.len() as u32);
            prop_assert_eq!(score.qsos, kept.len());
        }
    }
}
