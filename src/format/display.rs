//! Stringification
//!
//! Presentation-layer conversion of native field values to display form.
//! Applied after decode, never before: predicates and statistics always
//! compare native integers.

use super::{FieldSpec, SemanticKind};

/// IANA protocol keywords for the numbers that show up in flow data.
/// Anything else falls back to the bare number.
const PROTOCOL_NAMES: &[(u64, &str)] = &[
    (1, "ICMP"),
    (2, "IGMP"),
    (4, "IPIP"),
    (6, "TCP"),
    (17, "UDP"),
    (41, "IPV6"),
    (46, "RSVP"),
    (47, "GRE"),
    (50, "ESP"),
    (51, "AH"),
    (58, "ICMPV6"),
    (88, "EIGRP"),
    (89, "OSPF"),
    (103, "PIM"),
    (112, "VRRP"),
    (132, "SCTP"),
];

/// Display name for a protocol number, if one is known
pub fn protocol_name(number: u64) -> Option<&'static str> {
    PROTOCOL_NAMES
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, name)| *name)
}

/// Reverse lookup: protocol keyword → number (case-insensitive).
/// Used by the filter resolver to convert literals like "UDP".
pub fn protocol_number(name: &str) -> Option<u64> {
    PROTOCOL_NAMES
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(name))
        .map(|(number, _)| *number)
}

/// Convert a native field value to its display form
pub fn stringify_field(spec: &FieldSpec, value: u64) -> String {
    match spec.kind {
        SemanticKind::Ipv4Addr => {
            let v = value as u32;
            format!(
                "{}.{}.{}.{}",
                (v >> 24) & 0xff,
                (v >> 16) & 0xff,
                (v >> 8) & 0xff,
                v & 0xff
            )
        }
        SemanticKind::Protocol => match protocol_name(value) {
            Some(name) => name.to_string(),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}
