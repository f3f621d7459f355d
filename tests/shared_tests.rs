// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::sync::Arc;

use costbook::ledger::{close_shared, shared_with};
use costbook::models::NewCost;
use costbook::LedgerError;

// One test only: the shared handle is process-wide state.
#[test]
fn shared_handle_is_memoized_until_closed() {
    assert!(!close_shared());

    let first = shared_with(|| Ok(common::memory_ledger())).unwrap();
    let again = shared_with(|| panic!("initializer must not run twice")).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    first
        .add_cost(&NewCost {
            sum: 1.0,
            currency: "USD".into(),
            category: "Food".into(),
            description: String::new(),
        })
        .unwrap();
    assert_eq!(again.store().transaction_count(), first.store().transaction_count());

    assert!(close_shared());
    let failed = shared_with(|| Err(LedgerError::InvalidArgument("boom".into())));
    assert!(matches!(failed, Err(LedgerError::InvalidArgument(_))));

    let fresh = shared_with(|| Ok(common::memory_ledger())).unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert_eq!(fresh.store().transaction_count(), 0);
    assert!(close_shared());
}
