//! Barcode collection
//!
//! A scanner in keyboard-wedge mode types digits and a newline per book, so
//! barcode input is just lines. Collection ends at the first line that does
//! not look like an ISBN barcode, or at end of input.

use std::io::{self, BufRead};

use crate::domain::is_barcode;

/// Reads barcode tokens until a non-barcode line or end of input
///
/// The terminating line, if any, is handed back to the caller as its next
/// command context rather than being consumed twice.
pub fn read_barcodes<R: BufRead + ?Sized>(
    input: &mut R,
) -> io::Result<(Vec<String>, Option<String>)> {
    let mut barcodes = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok((barcodes, None));
        }

        let token = line.trim();
        if !is_barcode(token) {
            return Ok((barcodes, Some(token.to_string())));
        }
        barcodes.push(token.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ISBN1: &str = "9784789849944";
    const ISBN2: &str = "9784839919849";

    #[test]
    fn collects_until_end_of_input() {
        let mut input = Cursor::new(format!("{}\n{}\n", ISBN1, ISBN2));
        let (barcodes, last) = read_barcodes(&mut input).unwrap();
        assert_eq!(barcodes, vec![ISBN1, ISBN2]);
        assert_eq!(last, None);
    }

    #[test]
    fn stops_at_first_non_barcode_line() {
        let mut input = Cursor::new(format!("{}\nhogera\n{}\n", ISBN1, ISBN2));
        let (barcodes, last) = read_barcodes(&mut input).unwrap();
        assert_eq!(barcodes, vec![ISBN1]);
        assert_eq!(last.as_deref(), Some("hogera"));
    }

    #[test]
    fn blank_line_terminates() {
        let mut input = Cursor::new(format!("{}\n\n", ISBN1));
        let (barcodes, last) = read_barcodes(&mut input).unwrap();
        assert_eq!(barcodes, vec![ISBN1]);
        assert_eq!(last.as_deref(), Some(""));
    }

    #[test]
    fn digit_run_of_wrong_length_terminates() {
        let mut input = Cursor::new("123456789\n");
        let (barcodes, last) = read_barcodes(&mut input).unwrap();
        assert!(barcodes.is_empty());
        assert_eq!(last.as_deref(), Some("123456789"));
    }

    #[test]
    fn empty_input_is_empty() {
        let mut input = Cursor::new("");
        let (barcodes, last) = read_barcodes(&mut input).unwrap();
        assert!(barcodes.is_empty());
        assert_eq!(last, None);
    }
}
