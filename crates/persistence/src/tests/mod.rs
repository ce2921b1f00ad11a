// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::SqliteLedger;
use leave_intake_domain::{CivilDate, LeaveRecord, LeaveSpan};

pub const TEST_SPREADSHEET: &str = "leave-test";

pub fn create_test_ledger() -> SqliteLedger {
    SqliteLedger::new_in_memory(TEST_SPREADSHEET).expect("in-memory ledger")
}

pub fn create_test_record(user_id: &str, date: &str, span: LeaveSpan) -> LeaveRecord {
    LeaveRecord {
        request_timestamp: String::from("24/07/2567 09:15:00"),
        user_id: user_id.to_string(),
        user_real_name: String::from("Somchai Jaidee"),
        user_display_name: String::from("Chai"),
        leave_type: String::from("ลาพักร้อน"),
        date: CivilDate::parse(date).expect("valid civil date"),
        span,
        detail: format!("ขอลา {date}"),
        source_link: String::from("https://example.slack.com/archives/C1/p1"),
    }
}
