//! Splitting a dump into per-outbreak spans.

use std::ops::Range;

use tracing::{debug, warn};

use super::rules::{COUNT_DATE_GROUP, ID_CODE, LIST_MARKER};
use crate::models::config::SegmentationConfig;
use crate::models::record::{Era, RawDump, RawRecord};

/// How a dump was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStrategy {
    /// One record per unique-ID anchor.
    Anchors,
    /// Anchors were corrupted; one record per count/date group.
    CountDateGroups,
    /// Only one anchor and no groups; the whole tail is one record.
    SingleAnchor,
    /// Pre-2016 numbered list.
    NumberedList,
    /// Nothing to split on.
    Failed,
}

/// Records cut from one dump, plus the text that belongs to no record.
#[derive(Debug, Clone)]
pub struct Segmentation<'a> {
    pub dump: &'a RawDump,
    pub records: Vec<RawRecord<'a>>,
    /// Inter-record text (page headers before the first record).
    pub delimiters: Vec<Range<usize>>,
    pub strategy: SegmentStrategy,
}

impl<'a> Segmentation<'a> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Byte ranges of the dump attributed to neither a record nor a delimiter.
    ///
    /// Empty for every successful segmentation.
    pub fn uncovered(&self) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = self
            .records
            .iter()
            .map(|r| r.span.clone())
            .chain(self.delimiters.iter().cloned())
            .collect();
        spans.sort_by_key(|r| r.start);

        let mut gaps = Vec::new();
        let mut covered = 0;
        for span in spans {
            if span.start > covered {
                gaps.push(covered..span.start);
            }
            covered = covered.max(span.end);
        }
        if covered < self.dump.text.len() {
            gaps.push(covered..self.dump.text.len());
        }
        gaps
    }
}

/// Era-dependent record segmenter.
#[derive(Debug, Clone)]
pub struct RecordSegmenter {
    min_anchors: usize,
}

impl RecordSegmenter {
    pub fn new(min_anchors: usize) -> Self {
        Self { min_anchors: min_anchors.max(1) }
    }

    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self::new(config.min_anchors)
    }

    /// Split `dump` into record spans according to its era.
    pub fn segment<'a>(&self, dump: &'a RawDump) -> Segmentation<'a> {
        let text = dump.text.as_str();

        let (strategy, spans, delimiters) = match dump.era() {
            Era::Post2016 => self.segment_post_2016(text),
            Era::Pre2016 => {
                let markers: Vec<usize> = LIST_MARKER
                    .captures_iter(text)
                    .filter_map(|c| c.get(1).map(|m| m.start()))
                    .collect();
                if markers.is_empty() {
                    (SegmentStrategy::Failed, Vec::new(), Vec::new())
                } else {
                    let (spans, delimiters) = spans_from_starts(&markers, text.len());
                    (SegmentStrategy::NumberedList, unanchored(spans), delimiters)
                }
            }
        };

        if spans.is_empty() {
            warn!("No records found in {} ({} layout)", dump.source_file, dump.era());
        } else {
            debug!(
                "Segmented {} into {} records ({:?})",
                dump.source_file,
                spans.len(),
                strategy
            );
        }

        Segmentation {
            dump,
            records: spans
                .into_iter()
                .map(|(span, anchor)| match anchor {
                    Some(anchor) => RawRecord::new(dump, span).with_anchor(anchor),
                    None => RawRecord::new(dump, span),
                })
                .collect(),
            delimiters,
            strategy,
        }
    }

    fn segment_post_2016(
        &self,
        text: &str,
    ) -> (SegmentStrategy, Vec<AnchoredSpan>, Vec<Range<usize>>) {
        let anchors: Vec<usize> = ID_CODE.find_iter(text).map(|m| m.start()).collect();

        if anchors.len() >= self.min_anchors {
            let (spans, delimiters) = spans_from_starts(&anchors, text.len());
            return (SegmentStrategy::Anchors, unanchored(spans), delimiters);
        }

        debug!("Only {} anchors, falling back to count/date groups", anchors.len());

        let groups: Vec<Range<usize>> = COUNT_DATE_GROUP
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.range()))
            .collect();

        if !groups.is_empty() {
            let spans = spans_around_groups(&groups, text.len())
                .into_iter()
                .zip(groups.iter().cloned().map(Some))
                .collect();
            return (SegmentStrategy::CountDateGroups, spans, Vec::new());
        }

        match anchors.first() {
            Some(&start) => {
                let (spans, delimiters) = spans_from_starts(&[start], text.len());
                (SegmentStrategy::SingleAnchor, unanchored(spans), delimiters)
            }
            None => (SegmentStrategy::Failed, Vec::new(), Vec::new()),
        }
    }
}

impl Default for RecordSegmenter {
    fn default() -> Self {
        Self::from_config(&SegmentationConfig::default())
    }
}

/// A record span and the count/date group it was cut around.
type AnchoredSpan = (Range<usize>, Option<Range<usize>>);

fn unanchored(spans: Vec<Range<usize>>) -> Vec<AnchoredSpan> {
    spans.into_iter().map(|span| (span, None)).collect()
}

/// One span per start offset, each running to the next start; the last runs
/// to `len`. Text before the first start is returned as a delimiter.
fn spans_from_starts(starts: &[usize], len: usize) -> (Vec<Range<usize>>, Vec<Range<usize>>) {
    let spans = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| start..starts.get(i + 1).copied().unwrap_or(len))
        .collect();

    let delimiters = match starts.first() {
        Some(&first) if first > 0 => vec![0..first],
        _ => Vec::new(),
    };

    (spans, delimiters)
}

/// One span per group: the text since the previous group, the group itself,
/// and the text up to the next group. Neighbouring spans share the text
/// between their groups.
fn spans_around_groups(groups: &[Range<usize>], len: usize) -> Vec<Range<usize>> {
    (0..groups.len())
        .map(|i| {
            let start = if i == 0 { 0 } else { groups[i - 1].end };
            let end = groups.get(i + 1).map(|g| g.start).unwrap_or(len);
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::EraDetection;
    use pretty_assertions::assert_eq;

    fn dump(text: &str, era: Era) -> RawDump {
        RawDump::new(
            "test.txt",
            text,
            EraDetection { era, reference_year: None, ambiguous: false },
        )
    }

    const POST_2016: &str = "Weekly Outbreaks 2016\n\
        Unique ID State District Disease\n\
        MH/SAT/16/05/001 Maharashtra Satara Cholera 12 2 14-03-16 20-03-16 Under Control Team visited.\n\
        WB/MLD/16/05/002 West Bengal Malda Measles 7 0 15-03-16 Under Surveillance Vaccination done.\n\
        OR/KRP/16/05/003 Odisha Koraput Malaria 45 1 10-03-16 Under Investigation Samples sent.";

    #[test]
    fn test_anchor_count_equals_record_count() {
        let dump = dump(POST_2016, Era::Post2016);
        let seg = RecordSegmenter::default().segment(&dump);

        assert_eq!(seg.strategy, SegmentStrategy::Anchors);
        assert!(seg.records.iter().all(|r| r.anchor.is_none()));
        assert_eq!(seg.records.len(), ID_CODE.find_iter(POST_2016).count());
        assert_eq!(seg.records.len(), 3);
        assert!(seg.records[0].text().starts_with("MH/SAT/16/05/001"));
        assert!(seg.records[2].text().ends_with("Samples sent."));
    }

    #[test]
    fn test_spans_cover_dump() {
        let dump = dump(POST_2016, Era::Post2016);
        let seg = RecordSegmenter::default().segment(&dump);

        assert!(seg.uncovered().is_empty());
        let mut rebuilt: String = seg.delimiters.iter().map(|d| &POST_2016[d.clone()]).collect();
        for record in &seg.records {
            rebuilt.push_str(record.text());
        }
        assert_eq!(rebuilt, POST_2016);
    }

    #[test]
    fn test_fallback_to_count_date_groups() {
        let text = "Satara Cholera 12 2 14-03-16 Under control Malda Measles 7 0 15-03-16 Under surveillance";
        let dump = dump(text, Era::Post2016);
        let seg = RecordSegmenter::default().segment(&dump);

        assert_eq!(seg.strategy, SegmentStrategy::CountDateGroups);
        assert_eq!(seg.records.len(), 2);
        assert!(seg.records[0].text().starts_with("Satara"));
        assert!(seg.records[0].text().contains("12 2 14-03-16"));
        assert!(seg.records[1].text().contains("Malda Measles 7 0 15-03-16"));
        assert!(seg.records[1].text().ends_with("Under surveillance"));
        assert!(seg.uncovered().is_empty());

        let groups: Vec<_> = seg
            .records
            .iter()
            .map(|r| &r.text()[r.anchor_in_record().unwrap()])
            .collect();
        assert_eq!(groups, vec!["12 2 14-03-16", "7 0 15-03-16"]);
    }

    #[test]
    fn test_single_anchor_without_groups() {
        let dump = dump("header MH/SAT/16/05/001 Satara Cholera under control", Era::Post2016);
        let seg = RecordSegmenter::default().segment(&dump);

        assert_eq!(seg.strategy, SegmentStrategy::SingleAnchor);
        assert_eq!(seg.records.len(), 1);
        assert_eq!(seg.delimiters, vec![0..7]);
    }

    #[test]
    fn test_pre_2016_numbered_list() {
        let text = "Outbreaks 2012\n1. Assam Dhubri Cholera 12 0 02.01.12 Under control\n2. Bihar Patna Measles 4 0 03.01.12 Under surveillance trailing footer";
        let dump = dump(text, Era::Pre2016);
        let seg = RecordSegmenter::default().segment(&dump);

        assert_eq!(seg.strategy, SegmentStrategy::NumberedList);
        assert_eq!(seg.records.len(), 2);
        assert!(seg.records[0].text().starts_with("1. Assam"));
        assert!(seg.records[1].text().ends_with("trailing footer"));
        assert!(seg.uncovered().is_empty());
    }

    #[test]
    fn test_nothing_to_split_on() {
        let dump = dump("cover page only", Era::Pre2016);
        let seg = RecordSegmenter::default().segment(&dump);
        assert!(seg.is_empty());
        assert_eq!(seg.strategy, SegmentStrategy::Failed);
    }
}
