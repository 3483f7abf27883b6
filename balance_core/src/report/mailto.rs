//! Order-request `mailto:` link.
//!
//! ```rust
//! use balance_core::blade::BladeRecord;
//! use balance_core::analysis::Analysis;
//! use balance_core::report::mailto::order_request_link;
//! use balance_core::tolerance::Thresholds;
//!
//! let analysis = Analysis::from_records(vec![BladeRecord::new(100.0, 0.0)], Thresholds::default());
//! let link = order_request_link("orders@example.com", &analysis);
//! assert!(link.starts_with("mailto:orders@example.com?subject=%5BB-Balance.tech%5D%20Optimization%20Request"));
//! ```

use crate::analysis::Analysis;

pub const ORDER_SUBJECT: &str = "[B-Balance.tech] Optimization Request";

/// Message body summarizing the analysis.
pub fn order_request_body(analysis: &Analysis) -> String {
    format!(
        "Blade Count: {}, Resultant: {:.6} at {:.2}°",
        analysis.blade_count(),
        analysis.resultant.magnitude,
        analysis.resultant.angle
    )
}

/// Compose the link. The address is kept as given; subject and body are
/// percent-encoded.
pub fn order_request_link(email: &str, analysis: &Analysis) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        email.trim(),
        percent_encode(ORDER_SUBJECT),
        percent_encode(&order_request_body(analysis))
    )
}

/// RFC 3986 encoding: unreserved characters pass, every other byte becomes `%XX`.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blade::BladeRecord;
    use crate::tolerance::Thresholds;

    #[test]
    fn test_body_format() {
        let analysis = Analysis::from_records(
            vec![BladeRecord::new(10.0, 0.0), BladeRecord::new(10.0, 90.0)],
            Thresholds::default(),
        );
        assert_eq!(
            order_request_body(&analysis),
            "Blade Count: 2, Resultant: 14.142136 at 45.00°"
        );
    }

    #[test]
    fn test_link_is_encoded() {
        let analysis = Analysis::from_records(vec![BladeRecord::new(1.5, 30.0)], Thresholds::default());
        let link = order_request_link(" orders@example.com ", &analysis);
        assert_eq!(
            link,
            "mailto:orders@example.com?subject=%5BB-Balance.tech%5D%20Optimization%20Request\
             &body=Blade%20Count%3A%201%2C%20Resultant%3A%201.500000%20at%2030.00%C2%B0"
        );
    }

    #[test]
    fn test_subject_names_the_service() {
        assert_eq!(ORDER_SUBJECT, "[B-Balance.tech] Optimization Request");
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(percent_encode("safe-_.~"), "safe-_.~");
    }
}
