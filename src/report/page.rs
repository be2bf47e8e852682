/// Rows shown per page, across every report view.
pub const PAGE_SIZE: usize = 100;

/// Pagination over an in-memory row array. Pages are 1-indexed and every
/// request is clamped into range; an empty array still has one (empty) page.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    total: usize,
}

impl Pager {
    pub fn new(total: usize) -> Pager {
        Pager { total }
    }

    pub fn total_records(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(PAGE_SIZE).max(1)
    }

    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages())
    }

    /// Start/end indices (end exclusive) of a page after clamping.
    pub fn bounds(&self, page: usize) -> (usize, usize) {
        let page = self.clamp(page);
        let start = (page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.total);
        (start, end)
    }

    pub fn slice<'a, T>(&self, rows: &'a [T], page: usize) -> &'a [T] {
        let (start, end) = self.bounds(page);
        &rows[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_partition_the_input_exactly() {
        let rows: Vec<usize> = (0..257).collect();
        let pager = Pager::new(rows.len());
        assert_eq!(pager.total_pages(), 3);

        let mut rebuilt = Vec::new();
        for page in 1..=pager.total_pages() {
            rebuilt.extend_from_slice(pager.slice(&rows, page));
        }
        assert_eq!(rebuilt, rows);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let pager = Pager::new(200);
        assert_eq!(pager.total_pages(), 2);
        assert_eq!(pager.bounds(2), (100, 200));
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let rows: Vec<usize> = (0..150).collect();
        let pager = Pager::new(rows.len());

        assert_eq!(pager.clamp(0), 1);
        assert_eq!(pager.clamp(99), 2);
        assert_eq!(pager.slice(&rows, 99), pager.slice(&rows, 2));
        assert_eq!(pager.slice(&rows, 0), pager.slice(&rows, 1));
    }

    #[test]
    fn empty_input_has_one_empty_page() {
        let rows: Vec<usize> = Vec::new();
        let pager = Pager::new(0);

        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.bounds(1), (0, 0));
        assert!(pager.slice(&rows, 1).is_empty());
        assert!(pager.slice(&rows, 7).is_empty());
    }
}
