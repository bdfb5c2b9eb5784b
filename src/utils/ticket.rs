use regex::Regex;

/// Extracts the numeric part of a ticket ("manilla") label by stripping every
/// non-digit character. Handles formats like "T001", "321" or " 045 ".
/// Returns None when nothing numeric remains.
pub fn extract_ticket_number(ticket: Option<&str>) -> Option<i64> {
    let ticket = ticket?;
    let digits_only = Regex::new(r"\D").unwrap().replace_all(ticket, "");
    if digits_only.is_empty() {
        return None;
    }
    digits_only.parse::<i64>().ok()
}

/// Zero-pads a ticket number to the canonical 3-digit form ("5" -> "005").
pub fn pad_ticket_number(ticket: &str) -> String {
    format!("{:0>3}", ticket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_number() {
        assert_eq!(extract_ticket_number(Some("321")), Some(321));
        assert_eq!(extract_ticket_number(Some("005")), Some(5));
    }

    #[test]
    fn test_extract_with_prefix() {
        assert_eq!(extract_ticket_number(Some("T001")), Some(1));
        assert_eq!(extract_ticket_number(Some(" 045 ")), Some(45));
    }

    #[test]
    fn test_extract_invalid() {
        assert_eq!(extract_ticket_number(None), None);
        assert_eq!(extract_ticket_number(Some("")), None);
        assert_eq!(extract_ticket_number(Some("abc")), None);
        assert_eq!(extract_ticket_number(Some("---")), None);
    }

    #[test]
    fn test_pad_ticket_number() {
        assert_eq!(pad_ticket_number("5"), "005");
        assert_eq!(pad_ticket_number("45"), "045");
        assert_eq!(pad_ticket_number("500"), "500");
    }
}
