use framekart_backend::models::catalog::FacetSelection;

// The listing endpoints parse repeated query-string keys into Vec fields;
// these mirror the wire format the frontend sends.

#[test]
fn test_repeated_keys_collect_into_vecs() {
    let selection: FacetSelection =
        serde_html_form::from_str("shape=round&shape=oval&gender=men&price=1500-1999").unwrap();
    assert_eq!(selection.shape, vec!["round", "oval"]);
    assert_eq!(selection.gender, vec!["men"]);
    assert_eq!(selection.price, vec!["1500-1999"]);
    assert!(selection.brand.is_empty());
    assert_eq!(selection.page, None);
}

#[test]
fn test_empty_query_is_default() {
    let selection: FacetSelection = serde_html_form::from_str("").unwrap();
    assert_eq!(selection, FacetSelection::default());
}

#[test]
fn test_page_and_category_parse() {
    let selection: FacetSelection =
        serde_html_form::from_str("page=3&category=sunglasses").unwrap();
    assert_eq!(selection.page, Some(3));
    assert_eq!(selection.category.as_deref(), Some("sunglasses"));
}

#[test]
fn test_selection_round_trips() {
    let selection = FacetSelection {
        shape: vec!["round".to_string(), "cat-eye".to_string()],
        material: vec!["acetate".to_string()],
        price: vec!["2500-2999".to_string(), "3500-3999".to_string()],
        page: Some(2),
        ..Default::default()
    };
    let encoded = serde_html_form::to_string(&selection).unwrap();
    let decoded: FacetSelection = serde_html_form::from_str(&encoded).unwrap();
    assert_eq!(decoded, selection);
}
