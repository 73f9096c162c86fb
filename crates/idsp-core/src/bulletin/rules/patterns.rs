//! Common regex patterns for IDSP bulletin extraction.
//!
//! The `regex` crate has no look-around, so patterns that must start at a
//! whitespace boundary consume it with `(?:^|\s)` and put the value in a
//! capture group. Use the group offsets, not the whole match.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Unique ID: state code / district code / year / week / sequence,
    // e.g. MH/SAT/16/05/001 or WB/MLD/2016/10/285
    pub static ref ID_CODE: Regex = Regex::new(
        r"\b[A-Z]{2}\s?/\s?(?:[A-Z]{2,4}\s?)?/\s?\d{2,4}\s?/\s?\d{1,2}\s?/\s?\d{1,4}"
    ).unwrap();

    // Day, month and year separated by / . or -, with OCR slop around the separators
    pub static ref DATE: Regex = Regex::new(
        r"(?:^|\s)(\d{1,2}\s?[.,]?[/.\-][\s.]?\d{1,2}[.,\s]?[/.\-]\s?\d{2,4})"
    ).unwrap();

    // Digit groups of an already isolated date
    pub static ref DATE_PARTS: Regex = Regex::new(
        r"^\s*(\d{1,2})\D{1,3}(\d{1,2})\D{1,3}(\d{2,4})\s*$"
    ).unwrap();

    // Adjacent case/death counts, each optionally provisional (*)
    pub static ref COUNT_PAIR: Regex = Regex::new(
        r"(?:^|\s)((\d+)(\*?)\s?[\s/.\-]\s?(\d+)(\*?))(?:\s|$)"
    ).unwrap();

    // Count pair followed by the start date; recurs once per post-2016 row
    pub static ref COUNT_DATE_GROUP: Regex = Regex::new(
        r"(?:^|\s)(\d+\*?\s?[\s/.\-]\s?\d+\*?\s+\d{1,2}\s?[.,]?[/.\-][\s.]?\d{1,2}[.,\s]?[/.\-]\s?\d{2,4})"
    ).unwrap();

    // Status column: "Under control", "under surveillance", ...
    pub static ref STATUS: Regex = Regex::new(
        r"(?i)\bunder\s+(\w+)"
    ).unwrap();

    // Pre-2016 numbered list entry: "12. Assam ..."
    pub static ref LIST_MARKER: Regex = Regex::new(
        r"(?:^|\s)(\d{1,3}\.\s+[A-Za-z])"
    ).unwrap();

    // Candidate years for era detection
    pub static ref FOUR_DIGITS: Regex = Regex::new(
        r"\d{4}"
    ).unwrap();
}
