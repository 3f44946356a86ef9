//! Case Tracker Metrics
//!
//! 业务指标记录

use metrics::{counter, histogram};

// ============================================================================
// 案例 Metrics
// ============================================================================

/// 记录案例创建
pub fn record_case_created(case_type: &str, priority: &str, query_count: usize) {
    let labels = [
        ("case_type", case_type.to_string()),
        ("priority", priority.to_string()),
    ];

    counter!("tracker_cases_created_total", &labels).increment(1);
    histogram!("tracker_case_query_batch_size").record(query_count as f64);
}

/// 记录案例创建失败
pub fn record_case_creation_failed() {
    counter!("tracker_case_creation_failures_total").increment(1);
}

/// 记录列表查询
pub fn record_cases_listed(returned: usize) {
    counter!("tracker_case_list_requests_total").increment(1);
    histogram!("tracker_case_list_returned").record(returned as f64);
}

/// 记录详情查询
pub fn record_case_fetched(found: bool) {
    let labels = [("found", found.to_string())];
    counter!("tracker_case_fetches_total", &labels).increment(1);
}
