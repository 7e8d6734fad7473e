//! Ordering of collected quotes.
//!
//! Sorting is stable, so equal keys keep the order in which quotes were
//! recorded (which is completion order and differs between runs).
//! Descending output is the ascending sequence reversed as a whole, so ties
//! come out reversed as well.

use crate::types::{DomainQuote, SortDirection, SortKey};
use std::cmp::Ordering;

type Comparator = fn(&DomainQuote, &DomainQuote) -> Ordering;

fn by_name(a: &DomainQuote, b: &DomainQuote) -> Ordering {
    a.name().cmp(b.name())
}

fn by_max_price(a: &DomainQuote, b: &DomainQuote) -> Ordering {
    a.max_price().cmp(&b.max_price())
}

fn by_renew(a: &DomainQuote, b: &DomainQuote) -> Ordering {
    a.renew_price().cmp(&b.renew_price())
}

fn by_order(a: &DomainQuote, b: &DomainQuote) -> Ordering {
    a.order_price().cmp(&b.order_price())
}

/// Comparator for each key; `None` means "leave as is".
fn comparator(key: SortKey) -> Option<Comparator> {
    match key {
        SortKey::None => None,
        SortKey::Alphabetic => Some(by_name),
        SortKey::Price => Some(by_max_price),
        SortKey::Renew => Some(by_renew),
        SortKey::Order => Some(by_order),
    }
}

/// Sort `quotes` in place by `key`, then reverse for descending order.
pub fn sort_quotes(quotes: &mut [DomainQuote], key: SortKey, direction: SortDirection) {
    let Some(compare) = comparator(key) else {
        return;
    };

    quotes.sort_by(compare);
    if direction == SortDirection::Descending {
        quotes.reverse();
    }
}
