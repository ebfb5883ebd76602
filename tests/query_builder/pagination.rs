use query_scope::query_builder::pagination::Pagination;

#[test]
fn test_page_based_pagination() {
    let pagination = Pagination::new(2, 10); // Page 2, 10 per page
    assert_eq!(pagination.limit, Some(10));
    assert_eq!(pagination.offset, Some(10));
    assert_eq!(pagination.to_sql(), " LIMIT 10 OFFSET 10");
}

#[test]
fn test_first_page_pagination() {
    let pagination = Pagination::new(1, 20);
    assert_eq!(pagination.offset, Some(0));
    assert_eq!(pagination.to_sql(), " LIMIT 20 OFFSET 0");
}

#[test]
fn test_limit_only() {
    let pagination = Pagination::limit_only(5);
    assert_eq!(pagination.offset, None);
    assert_eq!(pagination.to_sql(), " LIMIT 5");
}

#[test]
fn test_total_pages_calculation() {
    let pagination = Pagination::new(1, 10);
    assert_eq!(pagination.total_pages(25), 3);
    assert_eq!(pagination.total_pages(30), 3);
    assert_eq!(pagination.total_pages(31), 4);
    assert_eq!(pagination.total_pages(0), 1);
}

#[test]
fn test_bounds_clamp_to_result_set() {
    assert_eq!(Pagination::new(3, 10).bounds(25), (20, 25));
    assert_eq!(Pagination::new(4, 10).bounds(25), (25, 25));
    assert_eq!(Pagination::limit_only(3).bounds(2), (0, 2));
}
