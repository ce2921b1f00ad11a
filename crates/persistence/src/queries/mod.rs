// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only ledger queries.

pub mod ledger;

pub use ledger::{find_partition_id, partition_header, partition_rows, row_at_position};
