//! Geometry and text for exporting a bill as a PDF and sharing it.

use crate::error::ValidationError;
use crate::money::format_inr;

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;
pub const PAGE_MARGIN_MM: f64 = 10.0;

const PHONE_DIGITS: usize = 10;
const COUNTRY_CODE: &str = "91";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: A4_WIDTH_MM,
        height: A4_HEIGHT_MM,
        margin: PAGE_MARGIN_MM,
    };
}

/// Where the rendered image lands on the page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFit {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scales an image to the printable area keeping its aspect ratio, centred.
///
/// A degenerate image fills the printable area.
pub fn fit_to_page(image_width: f64, image_height: f64, page: PageSize) -> PageFit {
    let max_width = (page.width - 2.0 * page.margin).max(0.0);
    let max_height = (page.height - 2.0 * page.margin).max(0.0);

    let usable = image_width.is_finite()
        && image_height.is_finite()
        && image_width > 0.0
        && image_height > 0.0;
    let (width, height) = if usable {
        let scale = (max_width / image_width).min(max_height / image_height);
        (image_width * scale, image_height * scale)
    } else {
        (max_width, max_height)
    };

    PageFit {
        x: (page.width - width) / 2.0,
        y: (page.height - height) / 2.0,
        width,
        height,
    }
}

/// What the phone field keeps as the user types.
pub fn phone_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keeps only the digits; exactly ten are required.
pub fn validate_phone(input: &str) -> Result<String, ValidationError> {
    let digits = phone_digits(input);
    if digits.len() == PHONE_DIGITS {
        Ok(digits)
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

/// Number in the form `wa.me` expects.
pub fn whatsapp_number(phone: &str) -> String {
    format!("{}{}", COUNTRY_CODE, phone)
}

/// `https://wa.me/<number>?text=<encoded>`; the caller supplies the already
/// URI-encoded message.
pub fn whatsapp_link(phone: &str, encoded_message: &str) -> String {
    format!("https://wa.me/{}?text={}", whatsapp_number(phone), encoded_message)
}

pub fn share_message(
    party_name: &str,
    invoice_number: &str,
    grand_total: f64,
    hotel_name: &str,
) -> String {
    let party = match party_name.trim() {
        "" => "Customer",
        name => name,
    };
    let mut message = format!(
        "Dear {},\nPlease find attached invoice {} for {}.",
        party,
        invoice_number,
        format_inr(grand_total)
    );
    if !hotel_name.trim().is_empty() {
        message.push_str(&format!("\n\nRegards,\n{}", hotel_name.trim()));
    }
    message
}

/// `invoice_<number>.pdf`, with characters unsafe in file names replaced.
pub fn pdf_file_name(invoice_number: &str) -> String {
    let cleaned: String = invoice_number
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("invoice_{}.pdf", cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_tall_image_is_height_bound() {
        let fit = fit_to_page(1000.0, 2000.0, PageSize::A4);
        assert_close(fit.height, 277.0);
        assert_close(fit.width, 138.5);
        assert_close(fit.y, 10.0);
        assert_close(fit.x, 35.75);
    }

    #[test]
    fn test_wide_image_is_width_bound() {
        let fit = fit_to_page(1900.0, 950.0, PageSize::A4);
        assert_close(fit.width, 190.0);
        assert_close(fit.height, 95.0);
        assert_close(fit.x, 10.0);
        assert_close(fit.y, 101.0);
    }

    #[test]
    fn test_degenerate_image_fills_printable_area() {
        let fit = fit_to_page(0.0, 500.0, PageSize::A4);
        assert_close(fit.width, 190.0);
        assert_close(fit.height, 277.0);
    }

    #[test]
    fn test_phone_validation() {
        assert_eq!(validate_phone("98765 43210").unwrap(), "9876543210");
        assert_eq!(validate_phone("(987) 654-3210").unwrap(), "9876543210");
        assert_eq!(validate_phone("12345"), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_phone("+91 98765 43210"), Err(ValidationError::InvalidPhone));
        assert_eq!(whatsapp_number("9876543210"), "919876543210");
        assert_eq!(
            whatsapp_link("9876543210", "Hi%20there"),
            "https://wa.me/919876543210?text=Hi%20there"
        );
    }

    #[test]
    fn test_phone_input_keeps_digits_only() {
        assert_eq!(phone_digits("98a76-5 43(210)"), "9876543210");
        assert_eq!(phone_digits("+91"), "91");
        assert_eq!(phone_digits("call me"), "");
    }

    #[test]
    fn test_message_and_file_name() {
        let message = share_message("Mehta", "INV/24", 150000.0, "Palm Court");
        assert!(message.starts_with("Dear Mehta,"));
        assert!(message.contains("INV/24"));
        assert!(message.contains("₹1,50,000.00"));
        assert!(message.ends_with("Palm Court"));
        assert!(share_message("", "1", 0.0, "").starts_with("Dear Customer,"));
        assert_eq!(pdf_file_name("INV/24"), "invoice_INV_24.pdf");
        assert_eq!(pdf_file_name("1042"), "invoice_1042.pdf");
    }
}
