/// Parse a 1-based page selection like "1,3-5" or "4-" into sorted, unique
/// 0-based page indices.
///
/// A range with no end ("4-") runs to the last page. Ranges given backwards
/// ("5-3") are rejected.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((first, last)) => {
                let first = page_number(first, page_count)?;
                let last = match last.trim() {
                    "" => page_count,
                    last => page_number(last, page_count)?,
                };
                if first > last {
                    return Err(format!("invalid page range '{part}': start is after end"));
                }
                pages.extend(first - 1..last);
            }
            None => pages.push(page_number(part, page_count)? - 1),
        }
    }

    if pages.is_empty() {
        return Err(format!("no pages selected by '{input}'"));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

/// Parse one 1-based page number and check it against the document.
fn page_number(text: &str, page_count: usize) -> Result<usize, String> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page > page_count {
        return Err(format!(
            "page {page} exceeds document page count ({page_count})"
        ));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pages() {
        assert_eq!(parse_page_range("1", 5).unwrap(), vec![0]);
        assert_eq!(parse_page_range("1,3,5", 5).unwrap(), vec![0, 2, 4]);
    }

    #[test]
    fn closed_and_open_ranges() {
        assert_eq!(parse_page_range("2-4", 5).unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_page_range("4-", 5).unwrap(), vec![3, 4]);
        assert_eq!(
            parse_page_range("1-2,5,7-", 8).unwrap(),
            vec![0, 1, 4, 6, 7]
        );
    }

    #[test]
    fn overlapping_selections_are_merged() {
        assert_eq!(parse_page_range("3,1-3,2", 5).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(parse_page_range(" 1 , 3 - 4 ", 5).unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn page_zero_rejected() {
        let err = parse_page_range("0-2", 5).unwrap_err();
        assert!(err.contains("page 0"));
    }

    #[test]
    fn page_past_end_rejected() {
        let err = parse_page_range("2-9", 5).unwrap_err();
        assert!(err.contains("exceeds"));
    }

    #[test]
    fn backwards_range_rejected() {
        let err = parse_page_range("4-2", 5).unwrap_err();
        assert!(err.contains("start is after end"));
    }

    #[test]
    fn garbage_rejected() {
        assert!(parse_page_range("one", 5).is_err());
        assert!(parse_page_range("1-x", 5).is_err());
    }

    #[test]
    fn empty_selection_rejected() {
        assert!(parse_page_range(" , ", 5).is_err());
    }
}
