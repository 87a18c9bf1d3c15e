use toolgate::filter::{AllowListState, apply, parse_lines};
use toolgate::primitives::ToolDescriptor;
use toolgate::registry::{ToolRegistry, ToolSource};

#[test]
fn facade_exposes_filter_pipeline() {
    let registry = ToolRegistry::from_descriptors(
        ["ArXiv_search_papers", "Other_tool"]
            .into_iter()
            .map(|name| ToolDescriptor::new(name).unwrap()),
    )
    .unwrap();

    let state = AllowListState::Filter(parse_lines(["ArXiv_search_papers"]));
    let advertised = apply(&registry.all_tools(), &state);

    assert_eq!(advertised.len(), 1);
    assert_eq!(advertised[0].name(), "ArXiv_search_papers");
}
