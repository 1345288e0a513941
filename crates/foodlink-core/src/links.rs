//! Outbound "view on external map" links.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const GOOGLE_MAPS_SEARCH: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Characters left unescaped by a browser's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Google Maps search URL for a street address.
#[must_use]
pub fn google_maps_search_url(address: &str) -> String {
    let encoded = utf8_percent_encode(address.trim(), URI_COMPONENT).to_string();
    format!("{GOOGLE_MAPS_SEARCH}{encoded}")
}
