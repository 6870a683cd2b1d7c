//! Order value derivation

use crate::core::order::{NewOrder, OrderDraft};

/// Price of one copy, in whole currency units
pub const UNIT_PRICE: i64 = 500;

/// Value of an order of `copies` copies at the unit price
pub fn order_value_for(copies: u32) -> i64 {
    i64::from(copies) * UNIT_PRICE
}

/// Settle the order value of a draft.
///
/// A value supplied with the input is kept as is; otherwise it is derived
/// from the number of copies.
pub fn price(draft: OrderDraft) -> NewOrder {
    let order_value = draft
        .order_value
        .unwrap_or_else(|| order_value_for(draft.copies));

    NewOrder {
        name: draft.name,
        email: draft.email,
        mobile: draft.mobile,
        copies: draft.copies,
        city: draft.city,
        status: draft.status,
        notes: draft.notes,
        order_value,
    }
}
