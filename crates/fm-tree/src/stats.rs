//! Counters collected over one pipeline run.
//!
//! # Examples
//!
//! ```
//! use fm_parser::LineRejection;
//! use fm_tree::RunStats;
//!
//! let mut stats = RunStats::default();
//! stats.record_rejection(LineRejection::NoUrl);
//! stats.record_rejection(LineRejection::StatusNotAccepted(404));
//! assert_eq!(stats.rejected_total(), 2);
//! ```

use fm_parser::LineRejection;
use serde::{Deserialize, Serialize};

/// Plain counters for one run, serializable for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Lines read from the input, blanks included.
    pub lines_total: usize,
    /// Lines that produced a record.
    pub records_parsed: usize,
    /// Blank lines.
    pub rejected_blank: usize,
    /// Lines without an HTTP(S) URL.
    pub rejected_no_url: usize,
    /// Lines without a status token.
    pub rejected_no_status: usize,
    /// Lines whose status is outside the accepted set.
    pub rejected_status: usize,
    /// Records dropped by deduplication.
    pub duplicates: usize,
    /// Records whose origin differs from the base URL.
    pub foreign_origin: usize,
    /// Distinct origins seen during detection.
    pub distinct_origins: usize,
    /// Records that received a tag.
    pub tagged: usize,
    /// Structural clashes while building the tree.
    pub conflicts: usize,
}

impl RunStats {
    /// Counts one rejected line under its reason.
    pub fn record_rejection(&mut self, rejection: LineRejection) {
        match rejection {
            LineRejection::Blank => self.rejected_blank += 1,
            LineRejection::NoUrl => self.rejected_no_url += 1,
            LineRejection::NoStatus => self.rejected_no_status += 1,
            LineRejection::StatusNotAccepted(_) => self.rejected_status += 1,
        }
    }

    /// Total rejected lines across all reasons.
    #[inline]
    #[must_use]
    pub const fn rejected_total(&self) -> usize {
        self.rejected_blank + self.rejected_no_url + self.rejected_no_status + self.rejected_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_counted_per_reason() {
        let mut stats = RunStats::default();
        for rejection in [
            LineRejection::Blank,
            LineRejection::Blank,
            LineRejection::NoUrl,
            LineRejection::NoStatus,
            LineRejection::StatusNotAccepted(301),
            LineRejection::StatusNotAccepted(500),
        ] {
            stats.record_rejection(rejection);
        }
        assert_eq!(stats.rejected_blank, 2);
        assert_eq!(stats.rejected_no_url, 1);
        assert_eq!(stats.rejected_no_status, 1);
        assert_eq!(stats.rejected_status, 2);
        assert_eq!(stats.rejected_total(), 6);
    }

    #[test]
    fn test_serializes_flat() {
        let json = serde_json::to_value(RunStats::default()).unwrap();
        assert_eq!(json["lines_total"], 0);
        assert_eq!(json["rejected_status"], 0);
    }
}
