use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,4}").unwrap();
}

pub fn mask_pii(input: &str) -> String {
    EMAIL_REGEX.replace_all(input, "***@***.***").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email_in_order_dump() {
        let input = r#"{"orderId":1,"email":"user@example.com"}"#;
        assert_eq!(mask_pii(input), r#"{"orderId":1,"email":"***@***.***"}"#);
    }

    #[test]
    fn test_no_pii() {
        let input = "Published data: 42";
        assert_eq!(mask_pii(input), input);
    }
}
