use indexmap::IndexMap;
use super::{LicenseCompliance, LicenseDetail, LicenseSummary, UNKNOWN_LICENSE};

pub fn is_unknown(detail: &LicenseDetail) -> bool {
    detail.license.eq_ignore_ascii_case(UNKNOWN_LICENSE)
}

/// Summary counts over the aggregated details
pub fn summarize(details: &[LicenseDetail], by_type: IndexMap<String, usize>) -> LicenseSummary {
    let total = details.len();
    let unknown = details.iter().filter(|d| is_unknown(d)).count();
    LicenseSummary {
        total,
        identified: total - unknown,
        unknown,
        by_type,
    }
}

pub fn score(summary: &LicenseSummary, incompatible_count: usize) -> LicenseCompliance {
    LicenseCompliance {
        has_incompatible_licenses: incompatible_count > 0,
        incompatible_count,
        unknown_count: summary.unknown,
        commercially_viable: incompatible_count == 0,
        requires_attribution: summary.identified > 0,
    }
}
