// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ledger mutations.
//!
//! Each function issues its statements directly; nothing here opens a
//! transaction, so a failure part way through leaves earlier writes in
//! place.

pub mod ledger;

pub use ledger::{RowDeletion, append_row, create_partition, delete_row_at_position};
