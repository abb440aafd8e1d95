//! Text scrapers for tplink-smarthome-api output.
//! `search` prints one line per device with model and IP; `getInfo` prints a
//! JavaScript object literal whose `id:` values are wrapped in ANSI colors.
//! Everything that depends on that human-readable format lives here.

use std::net::Ipv4Addr;
use std::sync::OnceLock;

use regex::Regex;

use crate::powerstrip::types::ResolveError;

/// Marker printed by `search` in front of a KP303's address.
pub const KP303_MARKER: &str = "KP303(US) plug IOT.SMARTPLUGSWITCH ";

const ID_LINE_TOKEN: &str = "id";
const ID_VALUE_MARKER: &str = "id: ";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_DEFAULT_FG: &str = "\x1b[39m";

fn dotted_quad() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+){3}").expect("dotted quad pattern is valid"))
}

/// Text following the first occurrence of `marker`.
pub fn text_after<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.split_once(marker).map(|(_, rest)| rest)
}

/// Address of the first device of the given model in `search` output.
/// Input:  "... KP303(US) plug IOT.SMARTPLUGSWITCH  192.168.1.50 ..."
/// Output: 192.168.1.50
pub fn parse_search_output(output: &str, marker: &str) -> Result<Ipv4Addr, ResolveError> {
    let tail = text_after(output, marker).ok_or_else(|| ResolveError::DeviceNotFoundOnNetwork {
        reason: format!("{:?} not found in search output", marker.trim_end()),
    })?;

    let quad = dotted_quad()
        .find(tail)
        .ok_or_else(|| ResolveError::DeviceNotFoundOnNetwork {
            reason: format!("no IPv4 address after {:?}", marker.trim_end()),
        })?
        .as_str();

    quad.parse::<Ipv4Addr>()
        .map_err(|_| ResolveError::DeviceNotFoundOnNetwork {
            reason: format!("{:?} after {:?} is not an IPv4 address", quad, marker.trim_end()),
        })
}

/// Outlet ids from `getInfo` output, in order of appearance.
/// Callers decide how many of them to keep.
pub fn parse_device_info(output: &str) -> Vec<String> {
    output.lines().filter_map(parse_outlet_line).collect()
}

/// One candidate line, e.g. `  id: '\x1b[32m8006...00\x1b[39m',`.
/// Lines mentioning "id" without an `id: ` value are skipped.
pub fn parse_outlet_line(line: &str) -> Option<String> {
    if !line.contains(ID_LINE_TOKEN) {
        return None;
    }
    let raw = text_after(line, ID_VALUE_MARKER)?;
    let id = clean_outlet_id(raw);
    (!id.is_empty()).then_some(id)
}

/// Strip quotes, commas and the green/default ANSI color codes around a value.
pub fn clean_outlet_id(raw: &str) -> String {
    raw.replace('\'', "")
        .replace(',', "")
        .replace(ANSI_GREEN, "")
        .replace(ANSI_DEFAULT_FG, "")
        .trim()
        .to_string()
}
